//! A single token bucket.

use crate::throttle::status::RateLimitStatus;

/// Continuously refilling token bucket.
///
/// Tokens are fractional internally; callers only ever see whole tokens.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: u64,
    refill_per_second: f64,
    tokens: f64,
    last_refill_ms: u64,
}

impl TokenBucket {
    /// A full bucket. `capacity` and `refill_per_second` must be positive.
    pub fn new(capacity: u64, refill_per_second: u64, now_ms: u64) -> Self {
        Self {
            capacity,
            refill_per_second: refill_per_second as f64,
            tokens: capacity as f64,
            last_refill_ms: now_ms,
        }
    }

    /// Whole tokens currently held, after refilling up to `now_ms`.
    pub fn available(&mut self, now_ms: u64) -> u64 {
        self.refill(now_ms);
        self.tokens.floor() as u64
    }

    /// Take one token if there is one.
    pub fn try_consume(&mut self, now_ms: u64) -> RateLimitStatus {
        self.refill(now_ms);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            RateLimitStatus::allowed(self.capacity, self.tokens.floor() as u64)
        } else {
            let missing = 1.0 - self.tokens;
            let retry_after = (missing / self.refill_per_second).ceil() as u64;
            RateLimitStatus::rejected(self.capacity, self.tokens.floor() as u64, retry_after)
        }
    }

    fn refill(&mut self, now_ms: u64) {
        // A stale timestamp from a racing reader counts as no time elapsed.
        let elapsed_ms = now_ms.saturating_sub(self.last_refill_ms);
        if elapsed_ms == 0 {
            return;
        }
        let added = elapsed_ms as f64 / 1000.0 * self.refill_per_second;
        self.tokens = (self.tokens + added).min(self.capacity as f64);
        self.last_refill_ms = now_ms;
    }
}
