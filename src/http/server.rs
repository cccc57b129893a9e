//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo handler
//! - Wire up middleware (request ID, tracing, timeout, throttling)
//! - Bind server to listener with peer address info
//! - Stop accepting on shutdown and drain in-flight requests

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::error::ThrottleError;
use crate::http::middleware::{rate_limit_middleware, RateLimitDecision, ThrottleState};
use crate::http::request::{self, RequestIdExt};

/// HTTP server fronted by the throttling layer.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    throttling: bool,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only when rate limit settings are present but not positive.
    pub fn new(config: GatewayConfig) -> Result<Self, ThrottleError> {
        let throttle = ThrottleState::from_config(&config)?;
        Ok(Self::with_state(config, throttle))
    }

    /// Create a server around an already built throttle state.
    pub fn with_state(config: GatewayConfig, throttle: ThrottleState) -> Self {
        let throttling = throttle.is_enabled();
        let router = Self::build_router(&config, throttle);
        Self {
            router,
            config,
            throttling,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, throttle: ThrottleState) -> Router {
        Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler))
            .layer(middleware::from_fn_with_state(throttle, rate_limit_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(request::propagate_request_id_layer())
            .layer(request::set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Whether requests are being throttled.
    pub fn is_throttling(&self) -> bool {
        self.throttling
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            throttling = self.throttling,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Describes the admitted request, including the throttle decision.
async fn echo_handler(request: Request<Body>) -> Json<Value> {
    let rate_limit = request
        .extensions()
        .get::<RateLimitDecision>()
        .map(|decision| {
            json!({
                "key": decision.key,
                "limit": decision.status.limit(),
                "remaining": decision.status.remaining(),
            })
        });

    tracing::debug!(
        request_id = request.request_id().unwrap_or("-"),
        method = %request.method(),
        path = %request.uri().path(),
        "Request admitted"
    );

    Json(json!({
        "status": "ok",
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "request_id": request.request_id(),
        "rate_limit": rate_limit,
    }))
}
