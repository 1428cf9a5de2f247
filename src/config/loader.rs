//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BreakersConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BreakersConfig, ConfigError> {
    let config: BreakersConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BreakersConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/breakers.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[breakers]]\nmax_requests = \"three\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        use std::error::Error as _;

        let err = parse_config("breakers = 3").unwrap_err();
        assert!(err.to_string().starts_with("Parse error: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validation_error_message() {
        let err = parse_config("[[breakers]]\nname = \"a\"\n[[breakers]]\nname = \"a\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: duplicate breaker name 'a'"
        );

        let err = parse_config("[[breakers]]\nname = \"\"\n[[breakers]]\nname = \"\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: breaker #0 has an empty name, breaker #1 has an empty name"
        );
    }
}
