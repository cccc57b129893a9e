//! Error types shared across the crate.

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::throttle::properties::Tier;

/// Errors raised while building throttling components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThrottleError {
    #[error("{tier} tier capacity per minute must be positive")]
    InvalidCapacity { tier: Tier },

    #[error("{tier} tier refill per second must be positive")]
    InvalidRefill { tier: Tier },
}

/// Errors raised while loading configuration from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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
