//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Breaker state machine and gate produce:
//!     → logging (tracing events: transitions, trips, rejections, stale reports)
//!     → metrics.rs (transition/rejection counters, state gauge)
//!
//! Consumers:
//!     → whatever subscriber / recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers and exporters is the host's job
//! - `logging::init` exists for binaries that want the default setup
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
