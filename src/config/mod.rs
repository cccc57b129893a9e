//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → RateLimitConfig::properties() → Some(tiers) | None (throttling off)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Missing rate limit settings disable throttling instead of failing startup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ClaimPrecedence;
pub use schema::GatewayConfig;
pub use schema::KeyResolutionConfig;
pub use schema::RateLimitConfig;

pub use loader::load_config;
pub use validation::{validate_config, ValidationError};
