//! Per-tier bucket sizing.

use std::fmt;

use crate::error::ThrottleError;
use crate::throttle::key::KeyType;

/// Budget class a key is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Authenticated,
    Unauthenticated,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Authenticated => f.write_str("authenticated"),
            Tier::Unauthenticated => f.write_str("unauthenticated"),
        }
    }
}

/// Capacity and refill rate for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub capacity_per_minute: u64,
    pub refill_per_second: u64,
}

impl TierLimits {
    pub fn new(capacity_per_minute: u64, refill_per_second: u64) -> Self {
        Self {
            capacity_per_minute,
            refill_per_second,
        }
    }

    fn validate(&self, tier: Tier) -> Result<(), ThrottleError> {
        if self.capacity_per_minute == 0 {
            return Err(ThrottleError::InvalidCapacity { tier });
        }
        if self.refill_per_second == 0 {
            return Err(ThrottleError::InvalidRefill { tier });
        }
        Ok(())
    }
}

/// Validated tier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitProperties {
    authenticated: TierLimits,
    unauthenticated: TierLimits,
}

impl RateLimitProperties {
    /// Both tiers must have a positive capacity and refill rate.
    pub fn new(
        authenticated: TierLimits,
        unauthenticated: TierLimits,
    ) -> Result<Self, ThrottleError> {
        authenticated.validate(Tier::Authenticated)?;
        unauthenticated.validate(Tier::Unauthenticated)?;
        Ok(Self {
            authenticated,
            unauthenticated,
        })
    }

    pub fn authenticated(&self) -> &TierLimits {
        &self.authenticated
    }

    pub fn unauthenticated(&self) -> &TierLimits {
        &self.unauthenticated
    }

    /// Tier for a key.
    ///
    /// Only `ip:` keys are unauthenticated. Keys with an unrecognised prefix
    /// fall into the authenticated tier.
    pub fn tier_for_key(key: &str) -> Tier {
        match KeyType::of(key) {
            KeyType::Ip => Tier::Unauthenticated,
            KeyType::User | KeyType::Service | KeyType::Auth | KeyType::Unknown => {
                Tier::Authenticated
            }
        }
    }

    pub fn limits_for_key(&self, key: &str) -> &TierLimits {
        match Self::tier_for_key(key) {
            Tier::Authenticated => &self.authenticated,
            Tier::Unauthenticated => &self.unauthenticated,
        }
    }

    pub fn resolve_capacity_for_key(&self, key: &str) -> u64 {
        self.limits_for_key(key).capacity_per_minute
    }

    pub fn resolve_refill_per_second_for_key(&self, key: &str) -> u64 {
        self.limits_for_key(key).refill_per_second
    }
}
