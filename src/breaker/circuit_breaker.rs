//! Circuit breaker: request gate and guarded-call façade.
//!
//! # Responsibilities
//! - Admit or reject requests (`before_request`)
//! - Record outcomes against the generation they were admitted in (`after_request`)
//! - Wrap closures and futures so outcomes are recorded automatically
//!
//! # Design Decisions
//! - One mutex per breaker, held only for bookkeeping, never across the operation
//! - Stale reports (generation mismatch) are dropped silently
//! - Panics and cancelled futures count as failures

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::breaker::counts::Counts;
use crate::breaker::error::{BreakerError, ExecuteError};
use crate::breaker::guard::OutcomeGuard;
use crate::breaker::settings::{IsSuccessful, Resolved, Settings};
use crate::breaker::state::{Policy, State, StateMachine};
use crate::clock::Clock;
use crate::observability::metrics;

struct Shared {
    name: String,
    clock: Arc<dyn Clock>,
    is_successful: IsSuccessful,
    machine: Mutex<StateMachine>,
}

/// A state machine that stops calling an operation that keeps failing.
///
/// Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct CircuitBreaker {
    shared: Arc<Shared>,
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.shared.name)
            .field("state", &self.state())
            .field("counts", &self.counts())
            .finish()
    }
}

impl CircuitBreaker {
    /// Build a breaker, applying defaults for unset settings.
    pub fn new(settings: Settings) -> Self {
        let resolved = Resolved::from(settings);
        let now = resolved.clock.now();
        let policy = Policy {
            name: resolved.name.clone(),
            max_requests: resolved.max_requests,
            interval: resolved.interval,
            timeout: resolved.timeout,
            ready_to_trip: resolved.ready_to_trip,
            on_state_change: resolved.on_state_change,
        };

        metrics::record_state(&resolved.name, State::Closed);

        Self {
            shared: Arc::new(Shared {
                name: resolved.name,
                clock: resolved.clock,
                is_successful: resolved.is_successful,
                machine: Mutex::new(StateMachine::new(policy, now)),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Current state, with any expired window reconciled first.
    pub fn state(&self) -> State {
        let now = self.shared.clock.now();
        self.machine().current_state(now).0
    }

    /// Snapshot of the current window's counts, with any expired window
    /// reconciled first.
    pub fn counts(&self) -> Counts {
        let now = self.shared.clock.now();
        let mut machine = self.machine();
        machine.current_state(now);
        machine.counts()
    }

    /// Current generation, with any expired window reconciled first.
    pub fn generation(&self) -> u64 {
        let now = self.shared.clock.now();
        self.machine().current_state(now).1
    }

    /// Run `req` if the breaker admits it.
    ///
    /// Rejections return immediately without calling `req`. Otherwise the
    /// operation's result is returned unchanged, with its error wrapped in
    /// [`ExecuteError::Inner`]. A panic inside `req` is recorded as a
    /// failure and then resumes unwinding.
    pub fn execute<T, E, F>(&self, req: F) -> Result<T, ExecuteError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: StdError + 'static,
    {
        let generation = self.before_request()?;
        let guard = OutcomeGuard::new(self, generation);

        let result = req();

        guard.record(self.is_successful(&result));
        result.map_err(ExecuteError::Inner)
    }

    /// Async counterpart of [`execute`](Self::execute).
    ///
    /// The future is only created once the request is admitted. Dropping the
    /// returned future after admission records a failure.
    pub async fn execute_async<T, E, F, Fut>(&self, req: F) -> Result<T, ExecuteError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + 'static,
    {
        let generation = self.before_request()?;
        let guard = OutcomeGuard::new(self, generation);

        let result = req().await;

        guard.record(self.is_successful(&result));
        result.map_err(ExecuteError::Inner)
    }

    fn is_successful<T, E>(&self, result: &Result<T, E>) -> bool
    where
        E: StdError + 'static,
    {
        match result {
            Ok(_) => true,
            Err(e) => (self.shared.is_successful)(e),
        }
    }

    /// Admission decision. Returns the generation to report against.
    pub(crate) fn before_request(&self) -> Result<u64, BreakerError> {
        let now = self.shared.clock.now();
        let mut machine = self.machine();
        let (state, generation) = machine.current_state(now);

        let rejection = match state {
            State::Open => Some(BreakerError::Open),
            State::HalfOpen if machine.counts().requests >= machine.policy().max_requests => {
                Some(BreakerError::TooManyRequests)
            }
            _ => None,
        };

        if let Some(err) = rejection {
            drop(machine);
            tracing::debug!(breaker = %self.shared.name, reason = err.reason(), "Request rejected");
            metrics::record_rejection(&self.shared.name, err);
            return Err(err);
        }

        machine.counts_mut().on_request();
        Ok(generation)
    }

    /// Record an outcome for a request admitted in `before`.
    pub(crate) fn after_request(&self, before: u64, success: bool) {
        let now = self.shared.clock.now();
        let mut machine = self.machine();
        let (state, generation) = machine.current_state(now);

        if generation != before {
            tracing::debug!(
                breaker = %self.shared.name,
                reported = before,
                current = generation,
                "Discarding stale outcome"
            );
            return;
        }

        if success {
            machine.on_success(state, now);
        } else {
            machine.on_failure(state, now);
        }
    }

    // A panicking user predicate poisons the lock; the machine is still
    // consistent because every mutation completes before a callback runs.
    fn machine(&self) -> MutexGuard<'_, StateMachine> {
        self.shared
            .machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
