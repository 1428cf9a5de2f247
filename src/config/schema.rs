//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::breaker::counts::Counts;
use crate::breaker::settings::{Settings, DEFAULT_CONSECUTIVE_FAILURES};

/// Root configuration: a set of named breakers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakersConfig {
    pub breakers: Vec<BreakerConfig>,
}

/// Declarative settings for one breaker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Breaker identifier for logs, metrics and notifications.
    pub name: String,

    /// Requests admitted while half-open.
    pub max_requests: u32,

    /// Closed-state counter reset period in milliseconds (0 = never).
    pub interval_ms: u64,

    /// Open-state duration in milliseconds before probing resumes.
    pub timeout_ms: u64,

    /// When to trip from closed to open.
    pub trip: TripPolicy,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_requests: 1,
            interval_ms: 0,
            timeout_ms: 60_000,
            trip: TripPolicy::default(),
        }
    }
}

impl BreakerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Convert to runtime settings. Callbacks and the clock can be added afterwards.
    pub fn to_settings(&self) -> Settings {
        let trip = self.trip.clone();
        Settings::new(self.name.clone())
            .max_requests(self.max_requests)
            .interval(self.interval())
            .timeout(self.timeout())
            .ready_to_trip(move |counts| trip.should_trip(counts))
    }
}

/// Trip decision evaluated after each failure while closed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TripPolicy {
    /// Trip when consecutive failures exceed `threshold`.
    ConsecutiveFailures {
        #[serde(default = "default_threshold")]
        threshold: u32,
    },

    /// Trip once at least `min_requests` were admitted and the failure
    /// share of reported outcomes reaches `ratio`.
    FailureRatio { min_requests: u32, ratio: f64 },
}

fn default_threshold() -> u32 {
    DEFAULT_CONSECUTIVE_FAILURES
}

impl Default for TripPolicy {
    fn default() -> Self {
        TripPolicy::ConsecutiveFailures {
            threshold: DEFAULT_CONSECUTIVE_FAILURES,
        }
    }
}

impl TripPolicy {
    pub fn should_trip(&self, counts: &Counts) -> bool {
        match *self {
            TripPolicy::ConsecutiveFailures { threshold } => counts.consecutive_failures > threshold,
            TripPolicy::FailureRatio { min_requests, ratio } => {
                counts.requests >= min_requests && counts.failure_ratio() >= ratio
            }
        }
    }
}
