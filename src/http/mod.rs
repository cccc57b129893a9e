//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info, graceful shutdown)
//!     → request.rs (assign and propagate request ID)
//!     → middleware/rate_limit.rs (resolve key, admit or 429)
//!     → echo handler (reports the admitted decision)
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{rate_limit_middleware, RateLimitDecision, ThrottleState};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
