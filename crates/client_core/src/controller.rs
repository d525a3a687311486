use std::sync::Arc;

use shared::{
    domain::{EmployeeFields, EmployeeId},
    protocol::DebugAction,
};
use tracing::{info, warn};

use crate::{
    api::RosterApi,
    dialog::{Dialog, Notifier, Prompt},
    error::ClientError,
    loader::ListLoader,
    render::ERROR_TITLE,
};

pub const ADDED_MESSAGE: &str = "Added successfully.";
pub const EDITED_MESSAGE: &str = "Edited successfully.";
pub const DELETED_MESSAGE: &str = "Deleted successfully.";
pub const DEBUG_SUCCESS_MESSAGE: &str = "[DEBUG] Task run success.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Cancelled,
}

/// CRUD and maintenance handlers. Each successful change refreshes the employee list; failures
/// are shown to the user and never retried automatically.
pub struct RosterController {
    api: RosterApi,
    loader: Arc<ListLoader>,
    dialog: Arc<dyn Dialog>,
    notifier: Arc<dyn Notifier>,
}

impl RosterController {
    pub fn new(
        api: RosterApi,
        loader: Arc<ListLoader>,
        dialog: Arc<dyn Dialog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            loader,
            dialog,
            notifier,
        }
    }

    pub fn loader(&self) -> &Arc<ListLoader> {
        &self.loader
    }

    pub async fn add_employee(&self) -> Result<ActionOutcome, ClientError> {
        match self.dialog.input(&Prompt::add_employee(), None).await {
            Some(fields) => self.submit_new(fields).await,
            None => Ok(ActionOutcome::Cancelled),
        }
    }

    pub async fn edit_employee(&self, id: EmployeeId) -> Result<ActionOutcome, ClientError> {
        let initial = if self.dialog.needs_prefill() {
            self.prefill(id).await
        } else {
            None
        };

        match self
            .dialog
            .input(&Prompt::edit_employee(), initial.as_ref())
            .await
        {
            Some(fields) => self.submit_edit(id, fields).await,
            None => Ok(ActionOutcome::Cancelled),
        }
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> Result<ActionOutcome, ClientError> {
        if self.dialog.confirm(&Prompt::confirm_deletion()).await {
            self.delete_confirmed(id).await
        } else {
            Ok(ActionOutcome::Cancelled)
        }
    }

    pub async fn submit_new(&self, fields: EmployeeFields) -> Result<ActionOutcome, ClientError> {
        let fields = self.validated(fields)?;
        let result = self.api.add_employee(&fields).await;
        self.finish(result, ADDED_MESSAGE).await
    }

    pub async fn submit_edit(
        &self,
        id: EmployeeId,
        fields: EmployeeFields,
    ) -> Result<ActionOutcome, ClientError> {
        let fields = self.validated(fields)?;
        let result = self.api.edit_employee(id, &fields).await;
        self.finish(result, EDITED_MESSAGE).await
    }

    pub async fn delete_confirmed(&self, id: EmployeeId) -> Result<ActionOutcome, ClientError> {
        let result = self.api.delete_employee(id).await;
        self.finish(result, DELETED_MESSAGE).await
    }

    pub async fn run_debug(&self, action: DebugAction) -> Result<ActionOutcome, ClientError> {
        info!(action = %action, "roster: running debug action");
        let result = self.api.run_debug(action).await;
        self.finish(result, DEBUG_SUCCESS_MESSAGE).await
    }

    /// Reloads the employee view without changing any data.
    pub async fn rerender(&self) {
        self.loader.load().await;
        self.notifier.notify(DEBUG_SUCCESS_MESSAGE);
    }

    async fn prefill(&self, id: EmployeeId) -> Option<EmployeeFields> {
        if !self.loader.store().has_loaded().await {
            self.loader.load().await;
        }
        let initial = self
            .loader
            .store()
            .employee(id)
            .await
            .map(|employee| employee.fields());
        if initial.is_none() {
            warn!(employee_id = id.0, "roster: editing employee missing from cached list");
        }
        initial
    }

    fn validated(&self, fields: EmployeeFields) -> Result<EmployeeFields, ClientError> {
        fields.normalized().map_err(|err| {
            let err = ClientError::from(err);
            self.notifier.show_error(ERROR_TITLE, &err.to_string());
            err
        })
    }

    async fn finish(
        &self,
        result: Result<Option<String>, ClientError>,
        success_message: &str,
    ) -> Result<ActionOutcome, ClientError> {
        match result {
            Ok(_) => {
                self.notifier.clear_error();
                self.notifier.notify(success_message);
                self.loader.load().await;
                Ok(ActionOutcome::Completed)
            }
            Err(err) => {
                let message = err
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                self.notifier.show_error(ERROR_TITLE, &message);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
