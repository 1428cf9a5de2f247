//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BreakersConfig (validated, immutable)
//!     → BreakerConfig::to_settings() per breaker
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Closures (callbacks, classifiers) cannot come from a file; they are
//!   attached to the `Settings` after conversion

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BreakerConfig, BreakersConfig, TripPolicy};
pub use validation::{validate_config, ValidationError};
