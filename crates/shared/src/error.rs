use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EmployeeId;

/// Error text the backend returns on a first run, before the employee table exists.
pub const TABLE_MISSING_SIGNATURE: &str =
    "Exception Caught: Table 'ci346_employees.employee_data' doesn't exist";

/// The `{"error": "..."}` payload the backend reports instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn table_missing() -> Self {
        Self::new(TABLE_MISSING_SIGNATURE)
    }

    /// Exact comparison; near misses are treated as ordinary backend errors.
    pub fn matches_any<S: AsRef<str>>(&self, signatures: &[S]) -> bool {
        signatures
            .iter()
            .any(|signature| signature.as_ref() == self.message)
    }

    pub fn is_table_missing(&self) -> bool {
        self.matches_any(&[TABLE_MISSING_SIGNATURE])
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("employee entry `{key}` is malformed: {source}")]
    MalformedEmployee {
        key: String,
        source: serde_json::Error,
    },
    #[error("employee id {0} appears more than once in the list")]
    DuplicateEmployee(EmployeeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid shift time `{0}`, expected HH:MM")]
    InvalidShiftTime(String),
    #[error("{0} must not be empty")]
    EmptyName(&'static str),
}
