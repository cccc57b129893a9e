//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::error::ThrottleError;
use crate::security::claims::{DEFAULT_SERVICE_CLAIM, DEFAULT_USER_CLAIMS};
use crate::throttle::properties::{RateLimitProperties, TierLimits};

/// Root configuration for the throttling gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-tier token bucket settings.
    pub rate_limit: RateLimitConfig,

    /// How identities are read from bearer tokens.
    pub key_resolution: KeyResolutionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
///
/// Every field is optional. Throttling only activates when all four are set;
/// a partial table leaves the gateway unthrottled.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Bucket capacity for `user:`, `service:` and `auth:` keys.
    pub authenticated_capacity_per_minute: Option<u64>,

    /// Tokens restored per second for authenticated keys.
    pub authenticated_refill_per_second: Option<u64>,

    /// Bucket capacity for `ip:` keys.
    pub unauthenticated_capacity_per_minute: Option<u64>,

    /// Tokens restored per second for `ip:` keys.
    pub unauthenticated_refill_per_second: Option<u64>,
}

impl RateLimitConfig {
    /// Build the tier properties, or `None` when throttling is not configured.
    pub fn properties(&self) -> Option<Result<RateLimitProperties, ThrottleError>> {
        let authenticated = TierLimits::new(
            self.authenticated_capacity_per_minute?,
            self.authenticated_refill_per_second?,
        );
        let unauthenticated = TierLimits::new(
            self.unauthenticated_capacity_per_minute?,
            self.unauthenticated_refill_per_second?,
        );
        Some(RateLimitProperties::new(authenticated, unauthenticated))
    }

    /// True when some but not all of the tier settings are present.
    pub fn is_partial(&self) -> bool {
        let present = [
            self.authenticated_capacity_per_minute,
            self.authenticated_refill_per_second,
            self.unauthenticated_capacity_per_minute,
            self.unauthenticated_refill_per_second,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count();
        present > 0 && present < 4
    }
}

/// Order in which claim extractors run.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimPrecedence {
    /// Service identifiers win over user claims.
    #[default]
    ServiceFirst,
    /// User claims win over service identifiers.
    UserFirst,
}

/// Claim names inspected when resolving a principal from a bearer token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyResolutionConfig {
    /// Claim carrying a machine identity.
    pub service_claim: String,

    /// User claims, highest precedence first.
    pub user_claims: Vec<String>,

    /// Extractor ordering.
    pub precedence: ClaimPrecedence,
}

impl Default for KeyResolutionConfig {
    fn default() -> Self {
        Self {
            service_claim: DEFAULT_SERVICE_CLAIM.to_string(),
            user_claims: DEFAULT_USER_CLAIMS.iter().map(|c| c.to_string()).collect(),
            precedence: ClaimPrecedence::default(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
