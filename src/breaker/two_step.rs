//! Two-step circuit breaker.
//!
//! For callers that cannot wrap their work in a single closure: `allow()`
//! makes the admission decision and hands back a [`Done`] token that
//! reports the outcome later.

use std::fmt;

use crate::breaker::circuit_breaker::CircuitBreaker;
use crate::breaker::counts::Counts;
use crate::breaker::error::BreakerError;
use crate::breaker::settings::Settings;
use crate::breaker::state::State;

/// Circuit breaker with separate admission and outcome reporting.
#[derive(Debug, Clone)]
pub struct TwoStepCircuitBreaker {
    cb: CircuitBreaker,
}

impl TwoStepCircuitBreaker {
    pub fn new(settings: Settings) -> Self {
        Self {
            cb: CircuitBreaker::new(settings),
        }
    }

    pub fn name(&self) -> &str {
        self.cb.name()
    }

    pub fn state(&self) -> State {
        self.cb.state()
    }

    pub fn counts(&self) -> Counts {
        self.cb.counts()
    }

    /// Check whether a request may proceed.
    ///
    /// On admission the returned [`Done`] must be used to report the outcome.
    pub fn allow(&self) -> Result<Done, BreakerError> {
        let generation = self.cb.before_request()?;
        Ok(Done {
            cb: self.cb.clone(),
            generation,
        })
    }
}

impl From<CircuitBreaker> for TwoStepCircuitBreaker {
    fn from(cb: CircuitBreaker) -> Self {
        Self { cb }
    }
}

/// Outcome reporter for one admitted request.
///
/// Reporting consumes the token, so an outcome is recorded at most once.
/// A token dropped without reporting is not counted.
#[must_use = "report the outcome with `Done::report`"]
pub struct Done {
    cb: CircuitBreaker,
    generation: u64,
}

impl Done {
    /// Generation the request was admitted in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn report(self, success: bool) {
        let Done { cb, generation } = self;
        cb.after_request(generation, success);
    }

    pub fn success(self) {
        self.report(true);
    }

    pub fn failure(self) {
        self.report(false);
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("breaker", &self.cb.name())
            .field("generation", &self.generation)
            .finish()
    }
}
