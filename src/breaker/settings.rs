//! Breaker settings and defaults.
//!
//! Caller-supplied behaviour (trip decision, success classification, state
//! change notification) is stored as shared function values.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::breaker::counts::Counts;
use crate::breaker::state::State;
use crate::clock::{Clock, SystemClock};

/// Default open-state duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default consecutive failure count that must be exceeded to trip.
pub const DEFAULT_CONSECUTIVE_FAILURES: u32 = 5;

pub type ReadyToTrip = Arc<dyn Fn(&Counts) -> bool + Send + Sync>;
pub type IsSuccessful = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;
pub type OnStateChange = Arc<dyn Fn(&str, State, State) + Send + Sync>;

/// Configuration for a [`CircuitBreaker`](crate::CircuitBreaker).
///
/// Zero values fall back to defaults when the breaker is built:
/// `max_requests` 0 becomes 1 and a zero `timeout` becomes 60 seconds.
/// A zero `interval` means counts are never reset while closed.
#[derive(Clone)]
pub struct Settings {
    pub name: String,
    /// Requests admitted while half-open.
    pub max_requests: u32,
    /// Cyclic period for clearing counts while closed.
    pub interval: Duration,
    /// Open-state duration before probing resumes.
    pub timeout: Duration,
    pub ready_to_trip: Option<ReadyToTrip>,
    pub is_successful: Option<IsSuccessful>,
    pub on_state_change: Option<OnStateChange>,
    pub clock: Arc<dyn Clock>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_requests: 0,
            interval: Duration::ZERO,
            timeout: Duration::ZERO,
            ready_to_trip: None,
            is_successful: None,
            on_state_change: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("name", &self.name)
            .field("max_requests", &self.max_requests)
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("ready_to_trip", &self.ready_to_trip.is_some())
            .field("is_successful", &self.is_successful.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Settings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Decide whether a failure while closed trips the breaker.
    ///
    /// Runs under the breaker's lock and must not call back into the same
    /// breaker. It may also run while a panic from the guarded operation is
    /// unwinding, so panicking here aborts the process.
    pub fn ready_to_trip<F>(mut self, f: F) -> Self
    where
        F: Fn(&Counts) -> bool + Send + Sync + 'static,
    {
        self.ready_to_trip = Some(Arc::new(f));
        self
    }

    /// Classify an operation error. Returning `true` counts it as a success.
    pub fn is_successful<F>(mut self, f: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        self.is_successful = Some(Arc::new(f));
        self
    }

    /// Notification for every real state change.
    ///
    /// Same constraints as [`ready_to_trip`](Self::ready_to_trip): runs under
    /// the breaker's lock, must not re-enter the breaker, and must not panic
    /// since it can be invoked during unwinding.
    pub fn on_state_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, State, State) + Send + Sync + 'static,
    {
        self.on_state_change = Some(Arc::new(f));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Trips when consecutive failures exceed five.
pub fn default_ready_to_trip(counts: &Counts) -> bool {
    counts.consecutive_failures > DEFAULT_CONSECUTIVE_FAILURES
}

/// Every error is a failure.
pub fn default_is_successful(_err: &(dyn StdError + 'static)) -> bool {
    false
}

/// Settings with every default applied.
pub(crate) struct Resolved {
    pub name: String,
    pub max_requests: u32,
    pub interval: Duration,
    pub timeout: Duration,
    pub ready_to_trip: ReadyToTrip,
    pub is_successful: IsSuccessful,
    pub on_state_change: Option<OnStateChange>,
    pub clock: Arc<dyn Clock>,
}

impl From<Settings> for Resolved {
    fn from(st: Settings) -> Self {
        Self {
            name: st.name,
            max_requests: if st.max_requests == 0 { 1 } else { st.max_requests },
            interval: st.interval,
            timeout: if st.timeout.is_zero() { DEFAULT_TIMEOUT } else { st.timeout },
            ready_to_trip: st
                .ready_to_trip
                .unwrap_or_else(|| Arc::new(default_ready_to_trip) as ReadyToTrip),
            is_successful: st
                .is_successful
                .unwrap_or_else(|| Arc::new(default_is_successful) as IsSuccessful),
            on_state_change: st.on_state_change,
            clock: st.clock,
        }
    }
}
