//! Route table and shared application state.
//!
//! Paths are exact-match only. A miss falls through to the 404 handler; a
//! hit with the wrong method gets the 405 handler.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::api;
use crate::clients::{DiscordClient, GmailClient, HackerNewsClient, LlmClient};
use crate::config::AppConfig;

/// Read-only state shared by every handler. The outbound clients all clone
/// one underlying connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
    pub news: HackerNewsClient,
    pub gmail: GmailClient,
    pub llm: LlmClient,
    pub discord: DiscordClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            news: HackerNewsClient::new(http.clone(), config.hacker_news_url.clone()),
            gmail: GmailClient::new(http.clone(), config.gmail_url.clone()),
            llm: LlmClient::new(
                http.clone(),
                config.openai_url.clone(),
                config.openai_api_key.clone(),
                config.openai_model.clone(),
            ),
            discord: DiscordClient::new(http.clone()),
            config: Arc::new(config),
            http,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/version.json", get(version))
        .route("/api/hacker-news", get(api::hacker_news::get_hacker_news))
        .route(
            "/api/hacker-news/send-to-discord",
            post(api::hacker_news::send_to_discord),
        )
        .route("/api/discord/new-message", post(api::discord::new_message))
        .route("/api/email/get-email", get(api::email::get_emails))
        .route(
            "/api/email/send-summarized-email",
            post(api::email::send_summarized_emails),
        )
        .route("/api/oauth2/callback", get(api::oauth::oauth_callback))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello World"
}

async fn version() -> Json<serde_json::Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404!")
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
