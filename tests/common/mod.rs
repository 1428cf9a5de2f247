//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use circuit_breaker::{CircuitBreaker, ExecuteError, ManualClock, Settings, State};

/// Error returned by simulated backends.
#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
pub struct BackendDown;

/// Breaker on a virtual clock.
pub fn breaker_with_clock(settings: Settings) -> (CircuitBreaker, ManualClock) {
    let clock = ManualClock::new();
    let cb = CircuitBreaker::new(settings.clock(Arc::new(clock.clone())));
    (cb, clock)
}

pub fn fail(cb: &CircuitBreaker) -> Result<(), ExecuteError<BackendDown>> {
    cb.execute(|| Err(BackendDown))
}

#[allow(dead_code)]
pub fn succeed(cb: &CircuitBreaker) -> Result<(), ExecuteError<BackendDown>> {
    cb.execute(|| Ok(()))
}

/// Recorded state-change notifications.
#[allow(dead_code)]
pub type Transitions = Arc<Mutex<Vec<(String, State, State)>>>;

/// Settings whose notifications are appended to the returned log.
#[allow(dead_code)]
pub fn recording_settings(name: &str) -> (Settings, Transitions) {
    let log: Transitions = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let settings = Settings::new(name).on_state_change(move |name, from, to| {
        sink.lock().unwrap().push((name.to_string(), from, to));
    });
    (settings, log)
}
