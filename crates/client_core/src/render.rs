//! Pure mapping from [`LoadState`] to what the employee view shows.

use std::fmt;

use shared::domain::EmployeeId;

use crate::store::{LoadState, TerminalReason};

pub const LOADING_TITLE: &str = "Loading";
pub const LOADING_MESSAGE: &str = "Fetching employee list...";
pub const EMPTY_TITLE: &str = "Notice";
pub const EMPTY_MESSAGE: &str =
    "There were no employees found. You can add new employees with the add command.";
pub const ERROR_TITLE: &str = "Error";
pub const TABLE_MISSING_MESSAGE: &str = "Table does not exist, please create the table.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub message: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub name: String,
    pub shift: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading(Panel),
    Empty(Panel),
    Table(Vec<EmployeeRow>),
    Error(Panel),
}

impl View {
    pub fn is_error(&self) -> bool {
        matches!(self, View::Error(_))
    }
}

pub fn render_view(state: &LoadState) -> View {
    match state {
        LoadState::NotLoaded => View::Loading(Panel::new(LOADING_TITLE, LOADING_MESSAGE)),
        LoadState::Loaded(list) if list.is_empty() => {
            View::Empty(Panel::new(EMPTY_TITLE, EMPTY_MESSAGE))
        }
        LoadState::Loaded(list) => View::Table(
            list.iter()
                .map(|employee| EmployeeRow {
                    id: employee.id,
                    name: employee.full_name(),
                    shift: employee.shift_label(),
                })
                .collect(),
        ),
        LoadState::Retrying { message, .. } => {
            View::Error(Panel::new(ERROR_TITLE, format!("{message} Retrying...")))
        }
        LoadState::TerminalError(TerminalReason::TableMissing) => {
            View::Error(Panel::new(ERROR_TITLE, TABLE_MISSING_MESSAGE))
        }
        LoadState::TerminalError(TerminalReason::RetriesExhausted { message, attempts }) => {
            View::Error(Panel::new(
                ERROR_TITLE,
                format!("{message} Gave up after {attempts} attempts."),
            ))
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.title, self.message)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading(panel) | View::Empty(panel) | View::Error(panel) => {
                write!(f, "{panel}")
            }
            View::Table(rows) => {
                let id_width = rows
                    .iter()
                    .map(|row| row.id.to_string().len())
                    .max()
                    .unwrap_or(0)
                    .max("ID".len());
                let name_width = rows
                    .iter()
                    .map(|row| row.name.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max("Name".len());
                write!(f, "{:<id_width$}  {:<name_width$}  Shift", "ID", "Name")?;
                for row in rows {
                    write!(
                        f,
                        "\n{:<id_width$}  {:<name_width$}  {}",
                        row.id.to_string(),
                        row.name,
                        row.shift
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Callback the UI layer supplies to redraw the employee view. Must be idempotent.
pub trait RenderTrigger: Send + Sync {
    fn render(&self, state: &LoadState);
}

impl<F> RenderTrigger for F
where
    F: Fn(&LoadState) + Send + Sync,
{
    fn render(&self, state: &LoadState) {
        self(state)
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
