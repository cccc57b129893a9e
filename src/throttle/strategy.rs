//! Rate limit key resolution.
//!
//! # Precedence
//! ```text
//! Authorization present (non-blank)?
//!     yes → "Bearer " scheme? → PrincipalResolver (other schemes → auth:unidentified)
//!             → service:<id> | user:<name> | auth:unidentified
//!     no  → AddressKeyResolver
//!             → ip:<X-Forwarded-For[0]> | ip:<X-Real-IP> | ip:<Remote-Addr>
//!               | ip:<peer> | ip:unknown
//! ```
//!
//! A request carrying any credential is never keyed by address. Otherwise a
//! caller could escape a per-identity budget by sending a garbage token.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{header::AUTHORIZATION, HeaderMap, Request};

use crate::security::{token, Principal, PrincipalResolver};
use crate::throttle::key::IP_PREFIX;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";
pub const REMOTE_ADDR: &str = "remote-addr";

/// Produces an `ip:` key for requests without credentials.
pub trait AddressKeyResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String;
}

/// Reads the client address from proxy headers, then the socket peer.
#[derive(Debug, Clone, Default)]
pub struct ForwardedHeaderAddressResolver;

impl AddressKeyResolver for ForwardedHeaderAddressResolver {
    fn resolve(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let forwarded = header_str(headers, X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let address = forwarded
            .or_else(|| non_blank(headers, X_REAL_IP))
            .or_else(|| non_blank(headers, REMOTE_ADDR));

        match (address, peer) {
            (Some(addr), _) => format!("{IP_PREFIX}{addr}"),
            (None, Some(peer)) => format!("{IP_PREFIX}{}", peer.ip()),
            (None, None) => format!("{IP_PREFIX}unknown"),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn non_blank<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    header_str(headers, name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Chooses between credential and address based keys for a request.
#[derive(Debug, Clone)]
pub struct KeyResolutionStrategy {
    principals: Arc<PrincipalResolver>,
    addresses: Arc<dyn AddressKeyResolver>,
}

impl KeyResolutionStrategy {
    pub fn new(principals: PrincipalResolver) -> Self {
        Self {
            principals: Arc::new(principals),
            addresses: Arc::new(ForwardedHeaderAddressResolver),
        }
    }

    pub fn with_address_resolver<R: AddressKeyResolver + 'static>(mut self, resolver: R) -> Self {
        self.addresses = Arc::new(resolver);
        self
    }

    /// Resolve the key for a request. Never fails.
    pub fn resolve<B>(&self, request: &Request<B>) -> String {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        self.resolve_headers(request.headers(), peer)
    }

    /// Resolve from headers alone, for callers outside the axum stack.
    pub fn resolve_headers(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        match non_blank(headers, AUTHORIZATION.as_str()) {
            Some(authorization) => self.resolve_credential(authorization),
            // Non-UTF-8 credentials still count as a credential.
            None if has_opaque_credential(headers) => Principal::Anonymous.rate_limit_key(),
            None => self.addresses.resolve(headers, peer),
        }
    }

    fn resolve_credential(&self, authorization: &str) -> String {
        // Other schemes are still credentials, just not ones we can read.
        let Some(token) = token::bearer_token(authorization) else {
            return Principal::Anonymous.rate_limit_key();
        };
        self.principals
            .resolve_from_token(token)
            .unwrap_or(Principal::Anonymous)
            .rate_limit_key()
    }
}

fn has_opaque_credential(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .is_some_and(|v| v.to_str().is_err())
}

impl Default for KeyResolutionStrategy {
    fn default() -> Self {
        Self::new(PrincipalResolver::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn bearer(payload: &str) -> String {
        format!("Bearer hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    fn request(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_service_token() {
        let strategy = KeyResolutionStrategy::default();
        let auth = bearer(r#"{"custom:service_id":"svc-A"}"#);
        let req = request(&[("Authorization", auth.as_str())]);
        assert_eq!(strategy.resolve(&req), "service:svc-A");
    }

    #[test]
    fn test_user_token() {
        let strategy = KeyResolutionStrategy::default();
        let auth = bearer(r#"{"email":"a@b.c"}"#);
        let req = request(&[("Authorization", auth.as_str())]);
        assert_eq!(strategy.resolve(&req), "user:a@b.c");
    }

    #[test]
    fn test_malformed_tokens_never_fall_back_to_ip() {
        let strategy = KeyResolutionStrategy::default();
        let bad_json = format!("Bearer h.{}.s", URL_SAFE_NO_PAD.encode("{oops"));
        for auth in [
            "Bearer invalid.token",
            "Bearer a.b.c.d",
            "Bearer h.***.s",
            bad_json.as_str(),
            "Bearer ",
            "Basic dXNlcjpwYXNz",
            "garbage",
        ] {
            let req = request(&[("Authorization", auth), ("X-Forwarded-For", "9.9.9.9")]);
            assert_eq!(strategy.resolve(&req), "auth:unidentified", "header: {auth}");
        }
    }

    #[test]
    fn test_claimless_token_is_unidentified() {
        let strategy = KeyResolutionStrategy::default();
        let auth = bearer(r#"{"scope":"read"}"#);
        let req = request(&[("Authorization", auth.as_str()), ("X-Real-IP", "5.5.5.5")]);
        assert_eq!(strategy.resolve(&req), "auth:unidentified");
    }

    #[test]
    fn test_token_without_bearer_scheme_is_unidentified() {
        let strategy = KeyResolutionStrategy::default();
        let raw = format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(r#"{"sub":"mallory"}"#));
        let lowercase = format!("bearer {raw}");
        for auth in [raw.as_str(), lowercase.as_str()] {
            let req = request(&[("Authorization", auth), ("X-Forwarded-For", "9.9.9.9")]);
            assert_eq!(strategy.resolve(&req), "auth:unidentified", "header: {auth}");
        }

        let bearer = format!("Bearer {raw}");
        let req = request(&[("Authorization", bearer.as_str())]);
        assert_eq!(strategy.resolve(&req), "user:mallory");
    }

    #[test]
    fn test_non_utf8_authorization_is_unidentified() {
        let strategy = KeyResolutionStrategy::default();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap());
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("9.9.9.9"));
        assert_eq!(strategy.resolve_headers(&headers, None), "auth:unidentified");
    }

    #[test]
    fn test_forwarded_for_first_address() {
        let strategy = KeyResolutionStrategy::default();
        let req = request(&[("X-Forwarded-For", "9.9.9.9, 1.1.1.1")]);
        assert_eq!(strategy.resolve(&req), "ip:9.9.9.9");
    }

    #[test]
    fn test_blank_authorization_uses_address() {
        let strategy = KeyResolutionStrategy::default();
        let req = request(&[("Authorization", "   "), ("X-Real-IP", "7.7.7.7")]);
        assert_eq!(strategy.resolve(&req), "ip:7.7.7.7");
    }

    #[test]
    fn test_address_header_priority() {
        let strategy = KeyResolutionStrategy::default();

        let req = request(&[("X-Real-IP", "2.2.2.2"), ("Remote-Addr", "3.3.3.3")]);
        assert_eq!(strategy.resolve(&req), "ip:2.2.2.2");

        let req = request(&[("Remote-Addr", "3.3.3.3")]);
        assert_eq!(strategy.resolve(&req), "ip:3.3.3.3");

        let req = request(&[("X-Forwarded-For", " , 4.4.4.4"), ("X-Real-IP", "2.2.2.2")]);
        assert_eq!(strategy.resolve(&req), "ip:2.2.2.2");
    }

    #[test]
    fn test_peer_address_then_unknown() {
        let strategy = KeyResolutionStrategy::default();

        let mut req = request(&[]);
        let peer: SocketAddr = "10.0.0.1:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(strategy.resolve(&req), "ip:10.0.0.1");

        assert_eq!(strategy.resolve(&request(&[])), "ip:unknown");
    }

    #[test]
    fn test_custom_address_resolver() {
        #[derive(Debug)]
        struct Fixed;
        impl AddressKeyResolver for Fixed {
            fn resolve(&self, _: &HeaderMap, _: Option<SocketAddr>) -> String {
                "ip:fixed".to_string()
            }
        }

        let strategy = KeyResolutionStrategy::default().with_address_resolver(Fixed);
        assert_eq!(strategy.resolve(&request(&[])), "ip:fixed");
    }
}
