use std::sync::Arc;

use shared::{
    domain::{Employee, EmployeeId},
    protocol::EmployeeList,
};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalReason {
    /// First run: the employee table has to be provisioned out of band.
    TableMissing,
    RetriesExhausted { message: String, attempts: u32 },
}

/// Outcome of the most recent employee list fetch, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded(Arc<EmployeeList>),
    Retrying { message: String, attempt: u32 },
    TerminalError(TerminalReason),
}

impl LoadState {
    pub fn employees(&self) -> Option<&EmployeeList> {
        match self {
            LoadState::Loaded(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            LoadState::Retrying { .. } | LoadState::TerminalError(_)
        )
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    state: LoadState,
    last_loaded: Option<Arc<EmployeeList>>,
}

/// Single-writer cache of the current [`LoadState`]. The list loader writes it; renderers and
/// CRUD handlers read it.
#[derive(Debug, Default)]
pub struct EmployeeStore {
    inner: RwLock<StoreInner>,
}

impl EmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_state(&self) -> LoadState {
        self.inner.read().await.state.clone()
    }

    /// Replaces the snapshot wholesale. Rendering is left to the caller.
    pub async fn set_state(&self, state: LoadState) {
        let mut guard = self.inner.write().await;
        if let LoadState::Loaded(list) = &state {
            guard.last_loaded = Some(Arc::clone(list));
        }
        guard.state = state;
    }

    /// True once any list has loaded, even if a later fetch failed.
    pub async fn has_loaded(&self) -> bool {
        self.inner.read().await.last_loaded.is_some()
    }

    /// Most recent successfully loaded list, kept across later errors.
    pub async fn last_loaded(&self) -> Option<Arc<EmployeeList>> {
        self.inner.read().await.last_loaded.clone()
    }

    pub async fn employee(&self, id: EmployeeId) -> Option<Employee> {
        self.inner
            .read()
            .await
            .last_loaded
            .as_ref()
            .and_then(|list| list.get(id))
            .cloned()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
