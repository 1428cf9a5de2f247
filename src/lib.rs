//! In-process circuit breaker.
//!
//! A breaker sits in front of an operation that may fail (usually a remote
//! call), counts outcomes per observation window, and once failures cross a
//! threshold refuses to call the operation until a cooldown has passed.
//!
//! ```text
//!   caller ──▶ execute / allow ──▶ request gate ──▶ state machine ──▶ counts
//!                    │                  ▲
//!                    ▼                  │
//!               operation ──outcome─────┘  (tagged with admission generation)
//! ```

pub mod breaker;
pub mod clock;
pub mod config;
pub mod observability;
pub mod registry;

pub use breaker::{
    BreakerError, CircuitBreaker, Counts, Done, ExecuteError, Settings, State,
    TwoStepCircuitBreaker,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BreakersConfig;
pub use registry::BreakerRegistry;
