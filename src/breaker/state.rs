//! Breaker state machine.
//!
//! # States
//! - Closed: requests pass through, failures are counted toward tripping
//! - Open: requests fail fast until the timeout elapses
//! - Half-Open: a limited number of probes decide recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: ready_to_trip(counts) after a failure
//! Open → Half-Open: expiry passed (checked lazily on next access)
//! Half-Open → Closed: consecutive successes >= max_requests
//! Half-Open → Open: any probe failure
//! ```
//!
//! # Design Decisions
//! - Every window is a generation; counts and expiry reset with it
//! - No timers; expiry is reconciled against the caller-supplied `now`
//! - Self-transitions are no-ops and never notify

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::breaker::counts::Counts;
use crate::breaker::settings::{OnStateChange, ReadyToTrip};
use crate::observability::metrics;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    Closed,
    HalfOpen,
    Open,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::HalfOpen => "half-open",
            State::Open => "open",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition rules shared by every generation.
pub(crate) struct Policy {
    pub name: String,
    pub max_requests: u32,
    pub interval: Duration,
    pub timeout: Duration,
    pub ready_to_trip: ReadyToTrip,
    pub on_state_change: Option<OnStateChange>,
}

/// Mutable breaker core. Always accessed under the breaker's lock.
pub(crate) struct StateMachine {
    policy: Policy,
    state: State,
    generation: u64,
    counts: Counts,
    expiry: Option<Instant>,
}

impl StateMachine {
    /// Start closed, in the first generation.
    pub fn new(policy: Policy, now: Instant) -> Self {
        let mut machine = Self {
            policy,
            state: State::Closed,
            generation: 0,
            counts: Counts::default(),
            expiry: None,
        };
        machine.new_generation(now);
        machine
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn counts_mut(&mut self) -> &mut Counts {
        &mut self.counts
    }

    /// Reconcile expired windows, then report `(state, generation)`.
    pub fn current_state(&mut self, now: Instant) -> (State, u64) {
        match self.state {
            State::Closed => {
                if self.expiry.is_some_and(|expiry| expiry < now) {
                    self.new_generation(now);
                }
            }
            State::Open => {
                if self.expiry.is_some_and(|expiry| expiry < now) {
                    self.set_state(State::HalfOpen, now);
                }
            }
            State::HalfOpen => {}
        }
        (self.state, self.generation)
    }

    pub fn on_success(&mut self, state: State, now: Instant) {
        match state {
            State::Closed => self.counts.on_success(),
            State::HalfOpen => {
                self.counts.on_success();
                if self.counts.consecutive_successes >= self.policy.max_requests {
                    self.set_state(State::Closed, now);
                }
            }
            State::Open => {}
        }
    }

    pub fn on_failure(&mut self, state: State, now: Instant) {
        match state {
            State::Closed => {
                self.counts.on_failure();
                if (self.policy.ready_to_trip)(&self.counts) {
                    tracing::warn!(
                        breaker = %self.policy.name,
                        consecutive_failures = self.counts.consecutive_failures,
                        total_failures = self.counts.total_failures,
                        requests = self.counts.requests,
                        "Circuit breaker tripped"
                    );
                    self.set_state(State::Open, now);
                }
            }
            State::HalfOpen => self.set_state(State::Open, now),
            State::Open => {}
        }
    }

    fn set_state(&mut self, state: State, now: Instant) {
        if self.state == state {
            return;
        }

        let prev = self.state;
        self.state = state;
        self.new_generation(now);

        tracing::info!(
            breaker = %self.policy.name,
            from = %prev,
            to = %state,
            generation = self.generation,
            "Circuit breaker state changed"
        );
        metrics::record_transition(&self.policy.name, prev, state);

        if let Some(on_state_change) = &self.policy.on_state_change {
            on_state_change(&self.policy.name, prev, state);
        }
    }

    fn new_generation(&mut self, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        self.counts.clear();

        self.expiry = match self.state {
            State::Closed if self.policy.interval.is_zero() => None,
            State::Closed => now.checked_add(self.policy.interval),
            State::Open => now.checked_add(self.policy.timeout),
            State::HalfOpen => None,
        };
    }

    #[cfg(test)]
    pub fn expiry(&self) -> Option<Instant> {
        self.expiry
    }
}
