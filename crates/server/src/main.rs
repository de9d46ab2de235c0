use anyhow::Context;
use clap::Parser;
use scrivener_server::{AppState, Config, app};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "scrivener_server=info,scrivener_core=info,tower_http=info";

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();
    let state = AppState::from_config(&config).context("Failed to configure extractor")?;
    let app = app(state, &config).context("Invalid CORS origin")?;

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, timeout_secs = config.timeout_secs, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
