pub mod api;
pub mod controller;
pub mod dialog;
pub mod error;
pub mod loader;
pub mod render;
pub mod store;
pub mod transport;

pub use api::RosterApi;
pub use controller::{ActionOutcome, RosterController};
pub use dialog::{Dialog, Notifier, Prompt};
pub use error::{ClientError, FailureKind};
pub use loader::{ListLoader, RetryPolicy};
pub use render::{render_view, Panel, RenderTrigger, View};
pub use store::{EmployeeStore, LoadState, TerminalReason};
pub use transport::{HttpTransport, RawResponse, Transport};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
