//! Hacker News API client module
//!
//! Two endpoints: the ranked top-story ID list and per-item detail.

use futures::future::try_join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// The projection of a Hacker News item this service exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
}

#[derive(Clone)]
pub struct HackerNewsClient {
    http: Client,
    base_url: String,
}

impl HackerNewsClient {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Ranked story IDs, best first.
    pub async fn top_story_ids(&self) -> Result<Vec<u64>, ApiError> {
        let response = self
            .http
            .get(format!("{}/topstories.json", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Internal(format!(
                "Failed to fetch top story IDs: {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    pub async fn story(&self, id: u64) -> Result<Story, ApiError> {
        let response = self
            .http
            .get(format!("{}/item/{}.json", self.base_url, id))
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// The top `quantity` stories, fetched in parallel. Results keep the
    /// ranked-list order, not completion order. One failed item fetch fails
    /// the whole batch.
    pub async fn top_stories(&self, quantity: usize) -> Result<Vec<Story>, ApiError> {
        let ids = self.top_story_ids().await?;
        let fetches = ids.into_iter().take(quantity).map(|id| self.story(id));
        try_join_all(fetches).await
    }
}
