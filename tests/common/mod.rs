//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use request_throttle::throttle::{
    Clock, KeyResolutionStrategy, RateLimitProperties, TierLimits, TokenBucketLimiter,
};
use request_throttle::http::ThrottleState;

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct FrozenClock {
    now: Arc<AtomicU64>,
}

impl FrozenClock {
    pub fn advance_secs(&self, secs: u64) {
        self.now.fetch_add(secs * 1000, Ordering::SeqCst);
    }
}

impl Clock for FrozenClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Unsigned token carrying `payload` as its claims.
pub fn token(payload: serde_json::Value) -> String {
    format!(
        "eyJhbGciOiJub25lIn0.{}.sig",
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn bearer(payload: serde_json::Value) -> String {
    format!("Bearer {}", token(payload))
}

pub fn limiter(auth: (u64, u64), unauth: (u64, u64), clock: FrozenClock) -> TokenBucketLimiter {
    let properties = RateLimitProperties::new(
        TierLimits::new(auth.0, auth.1),
        TierLimits::new(unauth.0, unauth.1),
    )
    .unwrap();
    TokenBucketLimiter::new(properties).with_clock(clock)
}

pub fn throttle_state(auth: (u64, u64), unauth: (u64, u64), clock: FrozenClock) -> ThrottleState {
    ThrottleState::new(
        KeyResolutionStrategy::default(),
        Some(Arc::new(limiter(auth, unauth, clock))),
    )
}

pub fn get(headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/resource");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}
