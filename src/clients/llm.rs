//! LLM (OpenAI) API client module
//!
//! Encapsulates the chat-completion calls that summarize email bodies.

use reqwest::Client;
use serde_json::{Value, json};

use crate::errors::ApiError;

/// System instruction sent with every summary request.
const SUMMARY_INSTRUCTION: &str =
    "Summarize the following email content concisely. 2 sentences max.";

/// Fallback when a completion comes back without content.
const NO_SUMMARY: &str = "No summary available.";

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(http: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
            model,
        }
    }

    /// One completion call. Returns the summary text for `content`.
    pub async fn summarize(&self, content: &str) -> Result<String, ApiError> {
        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SUMMARY_INSTRUCTION },
                { "role": "user", "content": content },
            ],
        });

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Upstream {
                status,
                message: format!("Failed to summarize email: {}", error_text),
            });
        }

        let body: Value = response.json().await?;
        let summary = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_SUMMARY)
            .to_string();
        Ok(summary)
    }
}
