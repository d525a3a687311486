use shared::error::{BackendError, DomainError, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request {route} failed: {message}")]
    Transport { route: String, message: String },
    #[error("request {route} returned HTTP {status}")]
    Status { route: String, status: u16 },
    #[error("malformed response: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("invalid employee: {0}")]
    Invalid(#[from] DomainError),
    #[error("invalid server url `{url}`: {message}")]
    InvalidServerUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// How the list loader should react to a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend schema is not provisioned; retrying cannot help.
    TerminalSetup,
    TransientFetch(String),
}

impl ClientError {
    pub fn failure_kind<S: AsRef<str>>(&self, terminal_signatures: &[S]) -> FailureKind {
        match self {
            ClientError::Backend(err) if err.matches_any(terminal_signatures) => {
                FailureKind::TerminalSetup
            }
            ClientError::Backend(err) => FailureKind::TransientFetch(err.message.clone()),
            other => FailureKind::TransientFetch(other.to_string()),
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Backend(err) => Some(err.message.as_str()),
            _ => None,
        }
    }
}
