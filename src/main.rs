mod api;
mod config;
mod data;
mod history;
mod monitoring;
mod orchestrator;
mod validation;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use config::Config;
use orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    monitoring::logger::init();

    tracing::info!("🏏 Win predictor backend starting...");
    tracing::info!("Loading configuration...");
    let config = Config::load()?;

    tracing::info!("Prediction engine: {}", config.engine_url);
    tracing::info!("History database: {}", config.database_path);
    tracing::info!(
        "Engine policy: timeout={:?}, max_retries={}",
        config.engine.timeout(),
        config.engine.max_retries
    );

    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
    let app = api::router(orchestrator.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("✅ Backend server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!(
        "Draining {} pending history writes...",
        orchestrator.recorder().pending()
    );
    orchestrator.recorder().drain().await;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
