use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::error::TABLE_MISSING_SIGNATURE;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    api::RosterApi,
    error::FailureKind,
    render::RenderTrigger,
    store::{EmployeeStore, LoadState, TerminalReason},
};

pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 8;
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(250);
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(5);
const MAX_BACKOFF_DOUBLINGS: u32 = 16;

/// How many times a transient list fetch failure is retried within one load, and how long to
/// wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total fetch attempts per load; `None` never gives up.
    pub max_attempts: Option<u32>,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(DEFAULT_RETRY_MAX_ATTEMPTS),
            initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Retries forever with no pause. Hammers a failing backend; opt in deliberately.
    pub fn unbounded_immediate() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn should_retry(&self, failures: u32) -> bool {
        match self.max_attempts {
            Some(max_attempts) => failures < max_attempts,
            None => true,
        }
    }

    /// Exponential backoff: `initial_delay * 2^(failures - 1)`, capped at `max_delay`.
    pub fn delay_before_retry(&self, failures: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let doublings = failures.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
        self.initial_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay.max(self.initial_delay))
    }
}

/// Fetches the employee list into an [`EmployeeStore`] and asks the UI to re-render after
/// every outcome.
///
/// Only one fetch is ever on the wire. Calls to [`ListLoader::load`] that arrive while a fetch
/// is running are folded into it: the response already in flight is treated as stale and the
/// list is fetched again, so a refresh requested after a mutation always observes it.
pub struct ListLoader {
    api: RosterApi,
    store: Arc<EmployeeStore>,
    renderer: Arc<dyn RenderTrigger>,
    policy: RetryPolicy,
    terminal_signatures: Vec<String>,
    requested: AtomicU64,
    settled: AtomicU64,
    in_flight: AtomicBool,
}

impl ListLoader {
    pub fn new(
        api: RosterApi,
        store: Arc<EmployeeStore>,
        renderer: Arc<dyn RenderTrigger>,
    ) -> Self {
        Self {
            api,
            store,
            renderer,
            policy: RetryPolicy::default(),
            terminal_signatures: vec![TABLE_MISSING_SIGNATURE.to_string()],
            requested: AtomicU64::new(0),
            settled: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_terminal_signatures<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminal_signatures = signatures.into_iter().map(Into::into).collect();
        self
    }

    pub fn store(&self) -> &Arc<EmployeeStore> {
        &self.store
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.load().await })
    }

    pub async fn load(&self) {
        let token = self.requested.fetch_add(1, Ordering::AcqRel) + 1;
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!(token, "roster: list load already in flight; coalescing");
            return;
        }

        loop {
            self.run_cycle().await;
            self.in_flight.store(false, Ordering::Release);

            // A load() that raced the flag release above still needs serving.
            if self.settled.load(Ordering::Acquire) >= self.requested.load(Ordering::Acquire) {
                break;
            }
            if self.in_flight.swap(true, Ordering::AcqRel) {
                break;
            }
        }
    }

    async fn run_cycle(&self) {
        let mut failures = 0u32;
        let mut current = self.requested.load(Ordering::Acquire);

        loop {
            let token = self.requested.load(Ordering::Acquire);
            if token != current {
                current = token;
                failures = 0;
            }

            let result = self.api.list_employees().await;
            if self.requested.load(Ordering::Acquire) != token {
                debug!(token, "roster: discarding stale employee list response");
                continue;
            }

            let err = match result {
                Ok(list) => {
                    info!(token, employees = list.len(), "roster: employee list loaded");
                    self.settle(token, LoadState::Loaded(Arc::new(list))).await;
                    return;
                }
                Err(err) => err,
            };

            match err.failure_kind(&self.terminal_signatures) {
                FailureKind::TerminalSetup => {
                    warn!(
                        token,
                        "roster: employee table missing; create it before loading the list"
                    );
                    self.settle(token, LoadState::TerminalError(TerminalReason::TableMissing))
                        .await;
                    return;
                }
                FailureKind::TransientFetch(message) => {
                    failures += 1;
                    if !self.policy.should_retry(failures) {
                        warn!(
                            token,
                            attempts = failures,
                            error = %message,
                            "roster: giving up on employee list"
                        );
                        self.settle(
                            token,
                            LoadState::TerminalError(TerminalReason::RetriesExhausted {
                                message,
                                attempts: failures,
                            }),
                        )
                        .await;
                        return;
                    }

                    let delay = self.policy.delay_before_retry(failures);
                    warn!(
                        token,
                        attempt = failures,
                        error = %message,
                        delay_ms = delay.as_millis() as u64,
                        "roster: employee list fetch failed; retrying"
                    );
                    self.publish(LoadState::Retrying {
                        message,
                        attempt: failures,
                    })
                    .await;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    async fn settle(&self, token: u64, state: LoadState) {
        self.settled.fetch_max(token, Ordering::AcqRel);
        self.publish(state).await;
    }

    async fn publish(&self, state: LoadState) {
        self.store.set_state(state.clone()).await;
        self.renderer.render(&state);
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
