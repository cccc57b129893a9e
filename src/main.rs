//! Request throttling server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ rate limit ─▶ handler
//!                                                        │
//!                                    ┌───────────────────┴────────────────┐
//!                                    │ strategy: credential or address    │
//!                                    │ limiter: per-key token bucket      │
//!                                    │ tiers: authenticated / anonymous   │
//!                                    └───────────────────┬────────────────┘
//!                                                        ▼
//!     ◀────────────────────────────────────── 429 + X-RateLimit-* headers
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_throttle::config::{load_config, validate_config, GatewayConfig};
use request_throttle::error::ConfigError;
use request_throttle::lifecycle::{trigger_on_signal, Shutdown};
use request_throttle::observability::init_logging;
use request_throttle::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "request-throttle", version, about = "HTTP server with per-caller rate limiting")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability.log_level)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "request-throttle starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    trigger_on_signal(shutdown);

    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
