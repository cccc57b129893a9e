//! Principal resolution from bearer tokens.

use crate::config::{ClaimPrecedence, KeyResolutionConfig};
use crate::security::claims::{ClaimExtractor, ServiceClaimExtractor, UserClaimExtractor};
use crate::security::principal::Principal;
use crate::security::token::TokenPayload;

/// Resolves a [`Principal`] by running claim extractors over a token payload.
///
/// Extractors are tried in the order they were supplied and the first match
/// wins. The order never changes after construction.
#[derive(Debug)]
pub struct PrincipalResolver {
    extractors: Vec<Box<dyn ClaimExtractor>>,
}

impl PrincipalResolver {
    pub fn new(extractors: Vec<Box<dyn ClaimExtractor>>) -> Self {
        Self { extractors }
    }

    /// Build the extractor chain described by configuration.
    pub fn from_config(config: &KeyResolutionConfig) -> Self {
        let service: Box<dyn ClaimExtractor> =
            Box::new(ServiceClaimExtractor::new(config.service_claim.clone()));
        let user: Box<dyn ClaimExtractor> =
            Box::new(UserClaimExtractor::new(config.user_claims.iter().cloned()));

        let extractors = match config.precedence {
            ClaimPrecedence::ServiceFirst => vec![service, user],
            ClaimPrecedence::UserFirst => vec![user, service],
        };
        Self::new(extractors)
    }

    /// Resolve a principal from a raw token (without the `Bearer ` prefix).
    pub fn resolve_from_token(&self, token: &str) -> Option<Principal> {
        let payload = TokenPayload::parse(token)?;
        self.extractors
            .iter()
            .find_map(|extractor| extractor.extract(&payload))
    }

    /// The service id carried by the token, if it resolves to a service.
    pub fn service_id(&self, token: &str) -> Option<String> {
        match self.resolve_from_token(token)? {
            Principal::Service { service_id } => Some(service_id),
            _ => None,
        }
    }

    /// The username carried by the token, if it resolves to a user.
    pub fn username(&self, token: &str) -> Option<String> {
        match self.resolve_from_token(token)? {
            Principal::User { username } => Some(username),
            _ => None,
        }
    }

    pub fn has_service_claim(&self, token: &str) -> bool {
        self.service_id(token).is_some()
    }
}

impl Default for PrincipalResolver {
    /// Service claims first, then the standard username claims.
    fn default() -> Self {
        Self::new(vec![
            Box::new(ServiceClaimExtractor::default()),
            Box::new(UserClaimExtractor::default()),
        ])
    }
}
