//! Google OAuth code-for-token exchange.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::errors::ApiError;
use crate::routes::AppState;

/// Exchange the `code` query parameter for an access token and pass the
/// token endpoint's JSON straight through on success.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let Some(code) = params.get("code") else {
        warn!("OAuth callback missing authorization code");
        return Ok(
            (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid code" }))).into_response(),
        );
    };

    let config = &state.config;
    let payload = [
        ("code", code.clone()),
        ("client_id", config.oauth_client_id.clone()),
        ("client_secret", config.oauth_client_secret.clone()),
        (
            "redirect_uri",
            format!("{}/api/oauth2/callback", config.public_url),
        ),
        ("grant_type", "authorization_code".to_string()),
    ];

    info!("Exchanging authorization code for access token");
    let response = state
        .http
        .post(&config.oauth_token_url)
        .form(&payload)
        .send()
        .await?;

    let status = response.status();
    let token_data: Value = response.json().await?;

    if status.is_success() {
        info!("Access token successfully retrieved");
        Ok(Json(token_data).into_response())
    } else {
        error!("Failed to retrieve access token: {}", token_data);
        Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Failed to retrieve access token",
                "details": token_data,
            })),
        )
            .into_response())
    }
}
