//! Direct webhook relay: one caller-supplied message, one Discord POST.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::{ApiError, FieldError};
use crate::routes::AppState;

#[derive(Debug)]
struct NewMessageParams {
    webhook_url: String,
    message: String,
}

/// Both fields are required plain strings. Validation failures are
/// collected per field, not short-circuited.
fn parse_new_message(body: &Value) -> Result<NewMessageParams, ApiError> {
    let mut errors = Vec::new();

    let webhook_url = match body.get("webhookUrl").and_then(Value::as_str) {
        Some(value) => value.to_string(),
        None => {
            errors.push(FieldError::new("webhookUrl", "webhookUrl must be a string"));
            String::new()
        }
    };
    let message = match body.get("message").and_then(Value::as_str) {
        Some(value) => value.to_string(),
        None => {
            errors.push(FieldError::new("message", "message must be a string"));
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    Ok(NewMessageParams {
        webhook_url,
        message,
    })
}

pub async fn new_message(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let body: Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::Internal(format!("Invalid JSON body: {}", e)))?;
    let params = parse_new_message(&body)?;

    state
        .discord
        .execute_webhook(&params.webhook_url, &params.message)
        .await?;

    info!("Message sent to webhook");
    Ok(Json(json!({ "status": "Message sent successfully" })))
}
