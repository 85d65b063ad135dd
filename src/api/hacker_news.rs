//! Hacker News endpoints: the JSON feed and the Discord digest.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::clients::hacker_news::Story;
use crate::errors::{ApiError, FieldError};
use crate::routes::AppState;

const DEFAULT_QUANTITY: u32 = 5;

/// Allowed `q` values for the JSON feed.
const FEED_QUANTITIES: &[u32] = &[5, 10, 15, 20];
const FEED_QUANTITY_MESSAGE: &str = "Quantity must be 5, 10, 15, or 20";

/// Allowed `q` values for the digest. Narrower than the feed's set; the two
/// entry points shipped with different constraints and both are kept.
const DIGEST_QUANTITIES: &[u32] = &[5, 15, 20];
const DIGEST_QUANTITY_MESSAGE: &str = "Quantity must be 5, 15, or 20";

/// Parse an optional string `q` against an allowed set. Only an absent `q`
/// means the default; anything supplied, empty included, must parse and be
/// in the set.
fn parse_quantity(raw: Option<&str>, allowed: &[u32], message: &str) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_QUANTITY);
    };
    match raw.parse::<u32>() {
        Ok(value) if allowed.contains(&value) => Ok(value),
        _ => Err(ApiError::Validation(vec![FieldError::new("q", message)])),
    }
}

pub async fn get_hacker_news(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Story>>, ApiError> {
    let quantity = parse_quantity(
        params.get("q").map(String::as_str),
        FEED_QUANTITIES,
        FEED_QUANTITY_MESSAGE,
    )?;
    Ok(Json(fetch_top_stories(&state, quantity).await))
}

/// Shared fetch with the degraded-failure policy: any error inside the
/// ranked-list or item fetches collapses to an empty feed, never an error
/// response.
async fn fetch_top_stories(state: &AppState, quantity: u32) -> Vec<Story> {
    match state.news.top_stories(quantity as usize).await {
        Ok(stories) => stories,
        Err(error) => {
            error!("Error fetching top stories: {}", error);
            Vec::new()
        }
    }
}

#[derive(Debug)]
struct DigestParams {
    quantity: u32,
    webhook_url: String,
}

fn parse_digest(body: &Value) -> Result<DigestParams, ApiError> {
    let mut errors = Vec::new();

    let quantity = match body.get("q") {
        None => DEFAULT_QUANTITY,
        Some(Value::String(raw)) => match raw.parse::<u32>() {
            Ok(value) if DIGEST_QUANTITIES.contains(&value) => value,
            _ => {
                errors.push(FieldError::new("q", DIGEST_QUANTITY_MESSAGE));
                DEFAULT_QUANTITY
            }
        },
        Some(_) => {
            errors.push(FieldError::new("q", DIGEST_QUANTITY_MESSAGE));
            DEFAULT_QUANTITY
        }
    };

    let webhook_url = match body.get("webhookUrl").and_then(Value::as_str) {
        Some(value) => value.to_string(),
        None => {
            errors.push(FieldError::new("webhookUrl", "webhookUrl must be a string"));
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    Ok(DigestParams {
        quantity,
        webhook_url,
    })
}

pub async fn send_to_discord(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, ApiError> {
    let body: Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::Internal(format!("Invalid JSON body: {}", e)))?;
    let params = parse_digest(&body)?;

    let stories = fetch_top_stories(&state, params.quantity).await;
    if stories.is_empty() {
        error!("No Hacker News data available to send");
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            "No Hacker News data available to send",
        )
            .into_response());
    }

    let message = format_story_digest(&stories);
    if let Err(error) = state
        .discord
        .execute_webhook(&params.webhook_url, &message)
        .await
    {
        return Err(ApiError::Upstream {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to send to Discord: {}", error.body_text()),
        });
    }

    info!(count = stories.len(), "Hacker News stories sent to Discord");
    Ok(
        Json(json!({ "status": "Hacker News stories sent to Discord successfully" }))
            .into_response(),
    )
}

/// One digest line per story: 1-based rank, bold title, URL in angle
/// brackets so chat clients suppress the embed.
fn format_story_digest(stories: &[Story]) -> String {
    stories
        .iter()
        .enumerate()
        .map(|(index, story)| {
            format!(
                "{}. **{}**\n<{}>",
                index + 1,
                story.title,
                story.url.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
