//! Throttling subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → strategy.rs (credential or address → rate limit key)
//!     → properties.rs (key prefix → tier → capacity, refill)
//!     → limiter.rs (key → lazily created bucket)
//!     → bucket.rs (refill, take one token)
//!     → status.rs (allowed, limit, remaining, retry after)
//! ```
//!
//! # Design Decisions
//! - Checks are synchronous and never hold a lock across an await
//! - One mutex per bucket inside a sharded map: keys only contend per shard
//! - Buckets live as long as the limiter (no eviction)
//! - Invalid tier settings are rejected at construction, not per request

pub mod bucket;
pub mod clock;
pub mod key;
pub mod limiter;
pub mod properties;
pub mod status;
pub mod strategy;

pub use clock::{Clock, MonotonicClock};
pub use key::KeyType;
pub use limiter::{RateLimiter, TokenBucketLimiter};
pub use properties::{RateLimitProperties, Tier, TierLimits};
pub use status::RateLimitStatus;
pub use strategy::{AddressKeyResolver, ForwardedHeaderAddressResolver, KeyResolutionStrategy};
