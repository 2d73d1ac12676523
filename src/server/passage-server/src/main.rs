//! Passage Server - Main entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use passage_session::{ClientConfig, SessionProvider};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "passage-server")]
#[command(about = "Nubster Passage - session context server")]
#[command(version)]
struct Cli {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8300", env = "PASSAGE_BIND_ADDRESS")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Passage server...");

    // Missing configuration is fatal
    let config = ClientConfig::from_env().context("Invalid session configuration")?;
    tracing::info!("Auth service: {}", config.service_url());

    let provider = SessionProvider::new(config).context("Failed to create auth backend")?;
    let app = passage_api::router(Arc::new(provider));

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
