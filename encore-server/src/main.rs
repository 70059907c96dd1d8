//! Encore server - Main entry point
//!
//! HTTP service holding all live song-request sessions in process memory.
//! Admin pages create and manage sessions, patron pages submit requests,
//! and the now-playing display polls the session state.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use encore_server::api::{self, AppState};
use encore_server::config::Config;
use encore_server::lifecycle::SessionManager;
use encore_server::store::SessionStore;

/// Command-line arguments for encore-server
#[derive(Parser, Debug)]
#[command(name = "encore-server")]
#[command(about = "Live song-request session service")]
#[command(version)]
struct Args {
    /// Port to listen on (falls back to ENCORE_PORT, then the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments and resolve configuration
    let args = Args::parse();
    let config = Config::resolve(args.port).context("Failed to resolve configuration")?;

    info!("Starting Encore server on port {}", config.port);

    // Build the store and lifecycle manager (all state lives here;
    // restarting the process loses every session)
    let store = Arc::new(SessionStore::new());
    let manager = Arc::new(SessionManager::new(store));

    // Build the application router
    let app_state = AppState {
        manager,
        port: config.port,
    };
    let app = api::create_router(app_state);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    // Create and run the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

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
