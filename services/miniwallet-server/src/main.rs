//! MiniWallet API Server
//!
//! Serves the virtual wallet REST API over an in-memory ledger.
//!
//! # Features
//!
//! - JWT identity tokens issued at account creation
//! - Per-wallet serialized deposits and withdrawals
//! - Optional Prometheus metrics export
//! - Graceful shutdown handling
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (development only)
//! miniwallet-server --dev-mode
//!
//! # Start with custom config
//! miniwallet-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! MINIWALLET__SERVER__PORT=8080 JWT_SECRET=... miniwallet-server
//! ```

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use miniwallet_api::{create_router, ApiConfig, AppState};

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// MiniWallet API Server
#[derive(Parser, Debug)]
#[command(name = "miniwallet-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "MINIWALLET_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "MINIWALLET_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MINIWALLET_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MINIWALLET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "MINIWALLET_LOG_FORMAT")]
    log_format: Option<String>,

    /// JWT secret key
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Replay movements that reuse a reference id instead of recording them twice
    #[arg(long, env = "MINIWALLET_IDEMPOTENT_REFERENCES")]
    idempotent_references: bool,

    /// Enable development mode (allows the default JWT secret)
    #[arg(long, env = "MINIWALLET_DEV_MODE")]
    dev_mode: bool,
}

impl Args {
    /// Apply CLI overrides on top of loaded configuration
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(jwt_secret) = self.jwt_secret {
            config.auth.jwt_secret = jwt_secret;
        }
        if self.idempotent_references {
            config.ledger.idempotent_references = true;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let dev_mode = args.dev_mode;

    // Load configuration
    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    // Initialize logging
    init_logging(&server_config.logging)?;

    tracing::info!(
        version = miniwallet_core::VERSION,
        "Starting MiniWallet API Server"
    );

    // Validate configuration
    validate_config(&server_config, dev_mode)?;

    // Create application state
    let state = Arc::new(AppState::in_memory(
        server_config.auth.jwt_config(),
        server_config.ledger.clone(),
    ));

    tracing::info!(
        idempotent_references = server_config.ledger.idempotent_references,
        "Wallet service initialized"
    );

    // Create API configuration
    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_compression: server_config.api.enable_compression,
        enable_tracing: server_config.api.enable_tracing,
        max_body_size: server_config.api.max_body_size,
    };

    // Create router
    let app = create_router(state, api_config);

    // Start metrics exporter if enabled
    if server_config.metrics.enabled {
        start_metrics_server(&server_config.metrics)?;
    }

    // Get bind address
    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .try_init()?;
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .try_init()?;
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    if config.auth.jwt_config().uses_default_secret() {
        if !dev_mode {
            anyhow::bail!(
                "JWT secret must be changed outside dev mode. Set JWT_SECRET environment variable."
            );
        }
        tracing::warn!("Using the default JWT secret (dev mode)");
    }

    if config.auth.token_lifetime.is_zero() {
        anyhow::bail!("auth.token_lifetime must be greater than zero");
    }

    Ok(())
}

/// Start Prometheus metrics exporter
fn start_metrics_server(config: &config::MetricsConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(port = config.port, "Metrics exporter started");

    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
