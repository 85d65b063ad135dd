//! courier - a small relay server between third-party APIs.
//!
//! It reads Hacker News top stories, unread Gmail messages, and OpenAI chat
//! completions, and forwards reshaped results to caller-supplied Discord
//! webhooks. Every route is a single request-scoped pipeline: validate, call
//! out, reshape, respond. The process keeps no state beyond configuration
//! and shared HTTP connection pools.
//!
//! # Example
//!
//! ```no_run
//! use courier::config::AppConfig;
//! use courier::routes::{self, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     courier::setup_logging();
//!
//!     let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
//!     let app = routes::app(AppState::new(config));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod errors;
pub mod routes;

/// Configure structured logging for the whole process.
///
/// `RUST_LOG` controls the filter; the default level is `info`.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
