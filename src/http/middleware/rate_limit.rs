//! Rate limiting middleware with tiered buckets.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::RETRY_AFTER, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::GatewayConfig;
use crate::error::ThrottleError;
use crate::http::request::RequestIdExt;
use crate::security::PrincipalResolver;
use crate::throttle::key::{display_identifier, KeyType};
use crate::throttle::{KeyResolutionStrategy, RateLimitStatus, RateLimiter, TokenBucketLimiter};

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Outcome attached to admitted requests for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub key: String,
    pub status: RateLimitStatus,
}

/// State for the rate limiting middleware.
///
/// Without a limiter every request passes through untouched.
#[derive(Clone)]
pub struct ThrottleState {
    strategy: KeyResolutionStrategy,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl ThrottleState {
    pub fn new(strategy: KeyResolutionStrategy, limiter: Option<Arc<dyn RateLimiter>>) -> Self {
        Self { strategy, limiter }
    }

    /// Build the strategy and, if all tier settings are present, the limiter.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ThrottleError> {
        let strategy =
            KeyResolutionStrategy::new(PrincipalResolver::from_config(&config.key_resolution));

        let limiter = match config.rate_limit.properties() {
            Some(properties) => {
                let properties = properties?;
                tracing::info!(
                    authenticated_capacity = properties.authenticated().capacity_per_minute,
                    authenticated_refill = properties.authenticated().refill_per_second,
                    unauthenticated_capacity = properties.unauthenticated().capacity_per_minute,
                    unauthenticated_refill = properties.unauthenticated().refill_per_second,
                    "Rate limiting enabled"
                );
                Some(Arc::new(TokenBucketLimiter::new(properties)) as Arc<dyn RateLimiter>)
            }
            None => {
                if config.rate_limit.is_partial() {
                    tracing::warn!("Rate limit settings incomplete; requests will not be throttled");
                } else {
                    tracing::info!("Rate limiting not configured; requests will not be throttled");
                }
                None
            }
        };

        Ok(Self::new(strategy, limiter))
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

/// Middleware function for tiered rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<ThrottleState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.limiter.as_ref() else {
        return next.run(request).await;
    };

    let key = state.strategy.resolve(&request);
    let status = limiter.try_consume(&key);

    if status.is_allowed() {
        tracing::trace!(
            key_type = %KeyType::of(&key),
            remaining = status.remaining(),
            "Rate limit check passed"
        );
        request
            .extensions_mut()
            .insert(RateLimitDecision { key, status });
        return next.run(request).await;
    }

    tracing::warn!(
        request_id = request.request_id().unwrap_or("-"),
        key_type = %KeyType::of(&key),
        identifier = %display_identifier(&key),
        limit = status.limit(),
        remaining = status.remaining(),
        "Rate limit exceeded"
    );
    rejection(&status)
}

/// 429 response carrying the limit headers.
pub fn rejection(status: &RateLimitStatus) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": "Rate limit exceeded" })),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(status.limit()));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(status.remaining()));
    if status.retry_after_seconds() > 0 {
        headers.insert(RETRY_AFTER, HeaderValue::from(status.retry_after_seconds()));
    }
    response
}
