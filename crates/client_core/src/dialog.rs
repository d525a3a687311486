//! User interaction seams for the CRUD handlers, independent of any UI toolkit.

use async_trait::async_trait;
use shared::domain::EmployeeFields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn confirm_deletion() -> Self {
        Self::new(
            "Confirm Deletion",
            "Are you sure you wish to delete this employee record?",
        )
    }

    pub fn add_employee() -> Self {
        Self::new("Add Employee", "Enter the new values below.")
    }

    pub fn edit_employee() -> Self {
        Self::new("Edit Employee", "Enter the new values below.")
    }
}

#[async_trait]
pub trait Dialog: Send + Sync {
    async fn confirm(&self, prompt: &Prompt) -> bool;

    /// Whether `input` uses the current record. When false, editing skips loading the list
    /// just to prefill.
    fn needs_prefill(&self) -> bool {
        true
    }

    /// `None` means the user cancelled.
    async fn input(
        &self,
        prompt: &Prompt,
        initial: Option<&EmployeeFields>,
    ) -> Option<EmployeeFields>;
}

pub trait Notifier: Send + Sync {
    /// Short-lived success message.
    fn notify(&self, message: &str);
    fn show_error(&self, title: &str, message: &str);
    fn clear_error(&self);
}
