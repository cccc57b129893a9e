//! Security subsystem: identity extraction for throttling.
//!
//! # Data Flow
//! ```text
//! Authorization: Bearer <header>.<payload>.<signature>
//!     → token.rs (strip scheme, split, base64url-decode payload, parse JSON)
//!     → claims.rs (ordered extractors: service claim, user claims)
//!     → resolver.rs (first match wins)
//!     → principal.rs (Service | User | Anonymous → rate limit key)
//! ```
//!
//! # Design Decisions
//! - Tokens are never verified; the identity is a throttling label only
//! - Every decode failure is swallowed and surfaces as "no principal"
//! - No trust in client input: raw tokens are never logged

pub mod claims;
pub mod principal;
pub mod resolver;
pub mod token;

pub use claims::{ClaimExtractor, ServiceClaimExtractor, UserClaimExtractor};
pub use principal::Principal;
pub use resolver::PrincipalResolver;
pub use token::TokenPayload;
