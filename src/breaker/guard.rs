//! Scope guard that reports an admitted request exactly once.

use crate::breaker::circuit_breaker::CircuitBreaker;

/// Reports a failure on drop unless an outcome was recorded first.
///
/// Covers unwinding out of a guarded closure and futures dropped before
/// completion.
pub(crate) struct OutcomeGuard<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    armed: bool,
}

impl<'a> OutcomeGuard<'a> {
    pub fn new(breaker: &'a CircuitBreaker, generation: u64) -> Self {
        Self {
            breaker,
            generation,
            armed: true,
        }
    }

    pub fn record(mut self, success: bool) {
        self.armed = false;
        self.breaker.after_request(self.generation, success);
    }
}

impl Drop for OutcomeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if std::thread::panicking() {
            tracing::debug!(breaker = %self.breaker.name(), "Guarded operation panicked");
        } else {
            tracing::debug!(breaker = %self.breaker.name(), "Guarded operation dropped before completion");
        }
        self.breaker.after_request(self.generation, false);
    }
}
