//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Breaker names are present and unique
//! - Trip policy values are in range
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BreakersConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{BreakersConfig, TripPolicy};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("breaker #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("duplicate breaker name '{0}'")]
    DuplicateName(String),

    #[error("breaker '{name}': failure ratio {ratio} must be in (0, 1]")]
    RatioOutOfRange { name: String, ratio: f64 },

    #[error("breaker '{name}': min_requests must be greater than 0")]
    ZeroMinRequests { name: String },
}

pub fn validate_config(config: &BreakersConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, breaker) in config.breakers.iter().enumerate() {
        if breaker.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        } else if !seen.insert(breaker.name.as_str()) {
            errors.push(ValidationError::DuplicateName(breaker.name.clone()));
        }

        if let TripPolicy::FailureRatio { min_requests, ratio } = breaker.trip {
            if !(ratio > 0.0 && ratio <= 1.0) {
                errors.push(ValidationError::RatioOutOfRange {
                    name: breaker.name.clone(),
                    ratio,
                });
            }
            if min_requests == 0 {
                errors.push(ValidationError::ZeroMinRequests {
                    name: breaker.name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BreakerConfig;

    fn named(name: &str) -> BreakerConfig {
        BreakerConfig {
            name: name.to_string(),
            ..BreakerConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = BreakersConfig {
            breakers: vec![named("a"), named("b")],
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_ratio = named("ratio");
        bad_ratio.trip = TripPolicy::FailureRatio {
            min_requests: 0,
            ratio: 1.5,
        };
        let config = BreakersConfig {
            breakers: vec![named(""), named("a"), named("a"), bad_ratio],
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyName { index: 0 },
                ValidationError::DuplicateName("a".to_string()),
                ValidationError::RatioOutOfRange {
                    name: "ratio".to_string(),
                    ratio: 1.5
                },
                ValidationError::ZeroMinRequests {
                    name: "ratio".to_string()
                },
            ]
        );
    }
}
