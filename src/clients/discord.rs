//! Discord webhook client module

use axum::http::StatusCode;
use reqwest::Client;
use serde_json::json;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
}

impl DiscordClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// POST `{"content": message}` to a caller-supplied webhook. Not
    /// idempotent: every call produces a new chat message.
    pub async fn execute_webhook(&self, webhook_url: &str, message: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(webhook_url)
            .json(&json!({ "content": message }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Failed to send message: {}", error_text),
            });
        }
        Ok(())
    }
}
