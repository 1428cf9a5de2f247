//! Circuit breaker subsystem.
//!
//! # Data Flow
//! ```text
//! Caller:
//!     → circuit_breaker.rs (execute / execute_async)
//!     → two_step.rs (allow → Done::report)
//!
//! Request gate (circuit_breaker.rs):
//!     before_request → admit or reject, tag with generation
//!     after_request  → drop stale reports, else record outcome
//!
//! State machine (state.rs):
//!     Closed → Open → Half-Open → Closed/Open
//!     → counts.rs (per-generation tallies)
//! ```
//!
//! # Design Decisions
//! - Per-dependency breaker (not global)
//! - Fail fast in Open state
//! - Outcomes from superseded windows never touch current counts

pub mod circuit_breaker;
pub mod counts;
pub mod error;
pub mod settings;
pub mod state;
pub mod two_step;

mod guard;

pub use circuit_breaker::CircuitBreaker;
pub use counts::Counts;
pub use error::{BreakerError, ExecuteError};
pub use settings::Settings;
pub use state::State;
pub use two_step::{Done, TwoStepCircuitBreaker};
