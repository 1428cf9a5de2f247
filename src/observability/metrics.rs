//! Metrics collection.
//!
//! # Metrics
//! - `circuit_breaker_transitions_total` (counter): state changes by breaker, from, to
//! - `circuit_breaker_rejections_total` (counter): refused requests by breaker, reason
//! - `circuit_breaker_state` (gauge): 0=closed, 1=half-open, 2=open
//!
//! # Design Decisions
//! - Labels are the breaker name plus low-cardinality enums
//! - Recording is a no-op until the host installs a recorder

use crate::breaker::error::BreakerError;
use crate::breaker::state::State;

pub const TRANSITIONS_TOTAL: &str = "circuit_breaker_transitions_total";
pub const REJECTIONS_TOTAL: &str = "circuit_breaker_rejections_total";
pub const STATE: &str = "circuit_breaker_state";

fn state_value(state: State) -> f64 {
    match state {
        State::Closed => 0.0,
        State::HalfOpen => 1.0,
        State::Open => 2.0,
    }
}

/// Record a state change and update the state gauge.
pub fn record_transition(breaker: &str, from: State, to: State) {
    metrics::counter!(
        TRANSITIONS_TOTAL,
        "breaker" => breaker.to_string(),
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
    record_state(breaker, to);
}

pub fn record_state(breaker: &str, state: State) {
    metrics::gauge!(STATE, "breaker" => breaker.to_string()).set(state_value(state));
}

pub fn record_rejection(breaker: &str, err: BreakerError) {
    metrics::counter!(
        REJECTIONS_TOTAL,
        "breaker" => breaker.to_string(),
        "reason" => err.reason()
    )
    .increment(1);
}
