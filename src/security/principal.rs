//! Identity classification used for throttling.

use crate::throttle::key::{AUTH_PREFIX, SERVICE_PREFIX, USER_PREFIX};

/// Key shared by every request whose credential yields no identity.
pub const UNIDENTIFIED_KEY: &str = "auth:unidentified";

/// Who a request claims to come from.
///
/// Derived from an unverified token; this is a throttling label, not an
/// authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// A machine caller identified by a service-id claim.
    Service { service_id: String },
    /// A human caller identified by one of the username claims.
    User { username: String },
    /// A credential was presented but carried no usable identity.
    Anonymous,
}

impl Principal {
    pub fn service(service_id: impl Into<String>) -> Self {
        Self::Service {
            service_id: service_id.into(),
        }
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self::User {
            username: username.into(),
        }
    }

    /// The bucket key for this principal.
    pub fn rate_limit_key(&self) -> String {
        match self {
            Principal::Service { service_id } => format!("{SERVICE_PREFIX}{service_id}"),
            Principal::User { username } => format!("{USER_PREFIX}{username}"),
            Principal::Anonymous => format!("{AUTH_PREFIX}unidentified"),
        }
    }
}
