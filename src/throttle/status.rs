//! Outcome of a rate limit check.

/// Result of one `try_consume` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    allowed: bool,
    limit: u64,
    remaining: u64,
    retry_after_seconds: u64,
}

impl RateLimitStatus {
    /// A token was taken; `remaining` is what is left afterwards.
    pub fn allowed(limit: u64, remaining: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            retry_after_seconds: 0,
        }
    }

    /// The bucket was empty. `retry_after_seconds` is clamped to at least 1.
    pub fn rejected(limit: u64, remaining: u64, retry_after_seconds: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining,
            retry_after_seconds: retry_after_seconds.max(1),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Bucket capacity for the key's tier.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Whole seconds until a token is available; 0 when allowed.
    pub fn retry_after_seconds(&self) -> u64 {
        self.retry_after_seconds
    }
}
