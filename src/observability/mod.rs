//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems emit tracing events
//!     → logging.rs (EnvFilter → fmt layer → stdout)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Rejections log at warn, admissions at trace
//! - Raw credentials never reach a log line

pub mod logging;

pub use logging::init_logging;
