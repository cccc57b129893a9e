//! Per-key token bucket limiter.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::throttle::bucket::TokenBucket;
use crate::throttle::clock::{Clock, MonotonicClock};
use crate::throttle::key::KeyType;
use crate::throttle::properties::RateLimitProperties;
use crate::throttle::status::RateLimitStatus;

/// Admission control keyed by rate limit key.
pub trait RateLimiter: Send + Sync {
    /// Attempt to consume a single permit for `key`.
    fn try_consume(&self, key: &str) -> RateLimitStatus;
}

/// In-memory limiter holding one bucket per key.
///
/// Buckets are created on first use, sized by the key's tier, and kept for
/// the lifetime of the limiter.
// TODO: bound the map for `ip:` keys; every distinct client address adds an
// entry that is never evicted.
#[derive(Debug)]
pub struct TokenBucketLimiter {
    buckets: DashMap<String, Mutex<TokenBucket>>,
    properties: RateLimitProperties,
    clock: Arc<dyn Clock>,
}

impl TokenBucketLimiter {
    pub fn new(properties: RateLimitProperties) -> Self {
        Self {
            buckets: DashMap::new(),
            properties,
            clock: Arc::new(MonotonicClock::default()),
        }
    }

    /// Override the clock (useful for deterministic tests).
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn properties(&self) -> &RateLimitProperties {
        &self.properties
    }

    /// Number of keys that currently own a bucket.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Drop every bucket, so all keys start full again.
    pub fn clear_buckets(&self) {
        self.buckets.clear();
    }

    fn create_bucket(&self, key: &str) -> Mutex<TokenBucket> {
        let capacity = self.properties.resolve_capacity_for_key(key);
        let refill = self.properties.resolve_refill_per_second_for_key(key);
        tracing::debug!(
            key_type = %KeyType::of(key),
            capacity,
            refill_per_second = refill,
            "Creating rate limit bucket"
        );
        Mutex::new(TokenBucket::new(capacity, refill, self.clock.now_millis()))
    }

    fn consume(&self, bucket: &Mutex<TokenBucket>) -> RateLimitStatus {
        // Bucket state is consistent between statements, so a poisoned lock is
        // still safe to use.
        let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        bucket.try_consume(self.clock.now_millis())
    }
}

impl RateLimiter for TokenBucketLimiter {
    fn try_consume(&self, key: &str) -> RateLimitStatus {
        if let Some(bucket) = self.buckets.get(key) {
            return self.consume(bucket.value());
        }

        let bucket = self
            .buckets
            .entry(key.to_owned())
            .or_insert_with(|| self.create_bucket(key))
            .downgrade();
        self.consume(bucket.value())
    }
}
