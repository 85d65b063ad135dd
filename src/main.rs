use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use courier::config::AppConfig;
use courier::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    courier::setup_logging();

    let config =
        AppConfig::from_env().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let port = config.port;

    let app = routes::app(AppState::new(config));
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!(port, "Listening");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
