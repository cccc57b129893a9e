//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacities and refill rates > 0, timeouts > 0)
//! - Reject claim settings that would make the extractor chain useless
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be positive")]
    ZeroRequestTimeout,

    #[error("rate_limit.{0} must be positive")]
    NonPositiveRateLimit(&'static str),

    #[error("key_resolution.service_claim must not be blank")]
    BlankServiceClaim,

    #[error("key_resolution.user_claims must not contain blank entries")]
    BlankUserClaim,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let rate_limit = &config.rate_limit;
    let settings = [
        ("authenticated_capacity_per_minute", rate_limit.authenticated_capacity_per_minute),
        ("authenticated_refill_per_second", rate_limit.authenticated_refill_per_second),
        ("unauthenticated_capacity_per_minute", rate_limit.unauthenticated_capacity_per_minute),
        ("unauthenticated_refill_per_second", rate_limit.unauthenticated_refill_per_second),
    ];
    for (name, value) in settings {
        if value == Some(0) {
            errors.push(ValidationError::NonPositiveRateLimit(name));
        }
    }

    let keys = &config.key_resolution;
    if keys.service_claim.trim().is_empty() {
        errors.push(ValidationError::BlankServiceClaim);
    }
    if keys.user_claims.iter().any(|c| c.trim().is_empty()) {
        errors.push(ValidationError::BlankUserClaim);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
