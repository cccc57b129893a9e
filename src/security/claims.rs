//! Claim extractors.
//!
//! Each extractor looks for one kind of identity in a decoded token payload.
//! Extractors never fail: a missing, null, blank or wrongly typed claim is
//! simply "not found".

use std::fmt::Debug;

use crate::security::principal::Principal;
use crate::security::token::TokenPayload;

/// Claim carrying a service identifier in Cognito client-credential tokens.
pub const DEFAULT_SERVICE_CLAIM: &str = "custom:service_id";

/// Username claims, highest precedence first.
pub const DEFAULT_USER_CLAIMS: [&str; 5] = [
    "cognito:username",
    "email",
    "preferred_username",
    "username",
    "sub",
];

/// Strategy that tries to read a principal out of a token payload.
pub trait ClaimExtractor: Send + Sync + Debug {
    fn extract(&self, payload: &TokenPayload) -> Option<Principal>;
}

/// Resolves [`Principal::Service`] from a single service-id claim.
#[derive(Debug, Clone)]
pub struct ServiceClaimExtractor {
    claim: String,
}

impl ServiceClaimExtractor {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
        }
    }
}

impl Default for ServiceClaimExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_CLAIM)
    }
}

impl ClaimExtractor for ServiceClaimExtractor {
    fn extract(&self, payload: &TokenPayload) -> Option<Principal> {
        payload.text_claim(&self.claim).map(Principal::service)
    }
}

/// Resolves [`Principal::User`] from the first populated username claim.
#[derive(Debug, Clone)]
pub struct UserClaimExtractor {
    claims: Vec<String>,
}

impl UserClaimExtractor {
    /// `claims` is checked in order; earlier entries take precedence.
    pub fn new<I, S>(claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claims: claims.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for UserClaimExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_USER_CLAIMS)
    }
}

impl ClaimExtractor for UserClaimExtractor {
    fn extract(&self, payload: &TokenPayload) -> Option<Principal> {
        self.claims
            .iter()
            .find_map(|claim| payload.text_claim(claim))
            .map(Principal::user)
    }
}
