//! Inbound HTTP request throttling.
//!
//! Every request is mapped to a rate limit key (service, user, anonymous
//! credential, or client address) and charged one token from that key's
//! bucket. Buckets are sized by tier: keys derived from credentials share the
//! authenticated limits, address keys the unauthenticated ones.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod throttle;

pub use config::schema::GatewayConfig;
pub use error::{ConfigError, ThrottleError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use throttle::{KeyResolutionStrategy, RateLimitStatus, RateLimiter, TokenBucketLimiter};
