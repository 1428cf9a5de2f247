//! Outcome counters for the current observation window.
//!
//! # Responsibilities
//! - Tally admitted requests, successes and failures
//! - Track success/failure streaks
//!
//! # Design Decisions
//! - Plain value type; the owning breaker serializes access
//! - Cleared wholesale on every new generation

use serde::{Deserialize, Serialize};

/// Request and outcome tallies for one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Requests admitted in this window.
    pub requests: u32,
    pub total_successes: u32,
    pub total_failures: u32,
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
}

impl Counts {
    pub(crate) fn on_request(&mut self) {
        self.requests = self.requests.saturating_add(1);
    }

    pub(crate) fn on_success(&mut self) {
        self.total_successes = self.total_successes.saturating_add(1);
        self.consecutive_successes = self.consecutive_successes.saturating_add(1);
        self.consecutive_failures = 0;
    }

    pub(crate) fn on_failure(&mut self) {
        self.total_failures = self.total_failures.saturating_add(1);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_successes = 0;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fraction of reported outcomes that were failures (0.0 with no outcomes).
    pub fn failure_ratio(&self) -> f64 {
        let reported = self.total_successes as u64 + self.total_failures as u64;
        if reported == 0 {
            return 0.0;
        }
        self.total_failures as f64 / reported as f64
    }
}
