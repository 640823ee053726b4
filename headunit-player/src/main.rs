//! Headunit Player - Main entry point
//!
//! Hosts the remote-controlled playback service: one player session plus
//! the mock device managers, mounted on an HTTP/SSE transport.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use headunit_common::config::BootstrapConfig;
use headunit_player::api::{self, AppContext};
use headunit_player::devices::DeviceHub;
use headunit_player::PlayerSession;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Command-line arguments for headunit-player
#[derive(Parser, Debug)]
#[command(name = "headunit-player")]
#[command(about = "Remote-controlled playback service for headunit")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "HEADUNIT_PORT")]
    port: Option<u16>,

    /// Path to the bootstrap config file
    #[arg(short, long, env = "HEADUNIT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load bootstrap configuration
    let config = BootstrapConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let default_filter = format!(
        "headunit_player={},tower_http=debug",
        config.logging.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let fmt_layer = match config.logging.file.as_ref() {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .boxed()
        }
        None => tracing_subscriber::fmt::layer().boxed(),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let port = args.port.unwrap_or(config.port);
    info!("Starting headunit player on port {}", port);

    // One explicitly constructed session per service instance
    let session = PlayerSession::new();
    let devices = Arc::new(DeviceHub::new());

    let ctx = AppContext {
        session: Arc::clone(&session),
        devices,
        port,
    };
    let app = api::create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Explicit teardown: release the engine, drop every subscriber
    session.teardown();

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
