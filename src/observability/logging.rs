//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for binaries
//! - Honour `RUST_LOG`, falling back to a supplied default filter

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "circuit_breaker=info";

/// Install the global subscriber.
///
/// Returns an error if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
}
