//! Bearer token handling.
//!
//! Tokens are split and their payload segment decoded, nothing more. The
//! signature is never checked, so the result must only ever be used as a
//! throttling label.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde_json::{Map, Value};

const BEARER_PREFIX: &str = "Bearer ";

/// Returns true if the header value uses the bearer scheme.
pub fn is_bearer(header: &str) -> bool {
    header.starts_with(BEARER_PREFIX)
}

/// Extract the token from an `Authorization` header value.
///
/// Returns `None` when the value does not use the bearer scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    is_bearer(header).then(|| header[BEARER_PREFIX.len()..].trim())
}

/// Pad a base64url segment with `=` up to the next multiple of four.
pub fn add_base64_padding(segment: &str) -> String {
    let target = segment.len().div_ceil(4) * 4;
    let mut padded = String::with_capacity(target);
    padded.push_str(segment);
    padded.extend(std::iter::repeat('=').take(target - segment.len()));
    padded
}

/// The decoded, unverified claim set of a token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    claims: Map<String, Value>,
}

impl TokenPayload {
    /// Decode the payload of a `header.payload.signature` token.
    ///
    /// Every failure (wrong shape, bad encoding, not a JSON object) yields
    /// `None`.
    pub fn parse(token: &str) -> Option<Self> {
        if token.trim().is_empty() {
            return None;
        }

        let mut segments: Vec<&str> = token.split('.').collect();
        // Trailing empty segments do not count: `a.b.` has two.
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        let [_, payload, _] = segments.as_slice() else {
            tracing::debug!(segments = segments.len(), "token does not have three segments");
            return None;
        };

        let bytes = match URL_SAFE.decode(add_base64_padding(payload)) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "unable to decode token payload");
                return None;
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(claims)) => Some(Self { claims }),
            Ok(_) => {
                tracing::debug!("token payload is not a JSON object");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "unable to parse token payload");
                None
            }
        }
    }

    /// Raw claim value.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// The claim as text, if it is a non-blank JSON string.
    pub fn text_claim(&self, name: &str) -> Option<&str> {
        match self.claim(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for TokenPayload {
    fn from(claims: Map<String, Value>) -> Self {
        Self { claims }
    }
}
