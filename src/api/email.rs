//! Mail endpoints: the unread-email feed and the summarize-to-Discord batch.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::future::try_join_all;
use serde_json::{Value, json};
use tracing::{error, info};
use url::Url;

use crate::clients::gmail::{EmailItem, body_from_payload, subject_from_headers};
use crate::errors::{ApiError, FieldError};
use crate::routes::AppState;

const DEFAULT_LABEL: &str = "inbox";
const DEFAULT_QUANTITY: u32 = 5;
const QUANTITY_MESSAGE: &str = "q must be a number between 1 and 200";

/// The raw Authorization header value. Whatever scheme the caller used is
/// forwarded untouched; empty counts as missing.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingAuth)
}

fn parse_mail_quantity(raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_QUANTITY);
    };
    match raw.parse::<u32>() {
        Ok(value) if (1..=200).contains(&value) => Ok(value),
        _ => Err(ApiError::Validation(vec![FieldError::new(
            "q",
            QUANTITY_MESSAGE,
        )])),
    }
}

pub async fn get_emails(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<EmailItem>>, ApiError> {
    let token = bearer_token(&headers)?;

    // Empty query values fall back to the defaults before validation.
    let label = params
        .get("label")
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LABEL);
    let quantity = parse_mail_quantity(
        params
            .get("q")
            .map(String::as_str)
            .filter(|value| !value.is_empty()),
    )?;

    let emails = fetch_emails(&state, token, label, quantity).await?;
    Ok(Json(emails))
}

/// Search then hydrate every hit in parallel, preserving search order.
/// Shared by the feed endpoint and the summarize composite. Zero matches is
/// an error here; one failed detail fetch fails the whole batch.
async fn fetch_emails(
    state: &AppState,
    token: &str,
    label: &str,
    quantity: u32,
) -> Result<Vec<EmailItem>, ApiError> {
    info!(label, quantity, "Fetching emails");
    let refs = state.gmail.search_messages(token, label, quantity).await?;
    if refs.is_empty() {
        info!("No unread emails found");
        return Err(ApiError::NoEmails);
    }

    info!(count = refs.len(), "Found messages, fetching details");
    let fetches = refs.iter().map(|reference| async move {
        let detail = state.gmail.message_detail(token, &reference.id).await?;
        let subject = subject_from_headers(&detail.payload.headers);
        let message = body_from_payload(&detail.payload);
        info!(subject = %subject, "Fetched email");
        Ok::<_, ApiError>(EmailItem {
            id: reference.id.clone(),
            thread_id: reference.thread_id.clone(),
            subject,
            message,
        })
    });
    let emails = try_join_all(fetches).await?;

    info!(count = emails.len(), "Fetched email details");
    Ok(emails)
}

#[derive(Debug)]
struct SummarizeParams {
    label: String,
    quantity: u32,
    webhook_url: String,
}

fn parse_summarize(body: &Value) -> Result<SummarizeParams, ApiError> {
    let mut errors = Vec::new();

    let label = match body.get("label") {
        None => DEFAULT_LABEL.to_string(),
        Some(Value::String(value)) => value.clone(),
        Some(_) => {
            errors.push(FieldError::new("label", "label must be a string"));
            String::new()
        }
    };

    let quantity = match body.get("q") {
        None => DEFAULT_QUANTITY,
        Some(Value::String(raw)) => match raw.parse::<u32>() {
            Ok(value) if (1..=200).contains(&value) => value,
            _ => {
                errors.push(FieldError::new("q", QUANTITY_MESSAGE));
                DEFAULT_QUANTITY
            }
        },
        Some(_) => {
            errors.push(FieldError::new("q", QUANTITY_MESSAGE));
            DEFAULT_QUANTITY
        }
    };

    let webhook_url = match body.get("webhookUrl").and_then(Value::as_str) {
        Some(raw) if Url::parse(raw).is_ok() => raw.to_string(),
        _ => {
            errors.push(FieldError::new(
                "webhookUrl",
                "webhookUrl must be a valid URL",
            ));
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    Ok(SummarizeParams {
        label,
        quantity,
        webhook_url,
    })
}

/// One summarized email, ready for relay.
struct EmailSummary {
    subject: String,
    summary: String,
}

pub async fn send_summarized_emails(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, ApiError> {
    let body: Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::Internal(format!("Invalid JSON body: {}", e)))?;
    // Body validation precedes the auth check on this route.
    let params = parse_summarize(&body)?;
    let token = bearer_token(&headers)?;

    let emails = match fetch_emails(&state, token, &params.label, params.quantity).await {
        Ok(emails) => emails,
        Err(error) => {
            error!("Failed to fetch emails: {}", error);
            return Ok((
                error.status(),
                Json(json!({
                    "error": format!("Failed to fetch emails: {}", error.body_text())
                })),
            )
                .into_response());
        }
    };

    info!(count = emails.len(), "Generating summaries");
    let llm = &state.llm;
    let completions = emails.iter().map(|email| async move {
        let summary = llm.summarize(&email.message).await.map_err(|error| {
            error!(subject = %email.subject, "Failed to summarize email: {}", error);
            error
        })?;
        info!(subject = %email.subject, "Generated summary");
        Ok::<_, ApiError>(EmailSummary {
            subject: email.subject.clone(),
            summary,
        })
    });
    // Any failed completion aborts the batch before the first relay; the
    // upstream detail stays in the logs only.
    let summaries = try_join_all(completions)
        .await
        .map_err(|error| ApiError::Internal(error.to_string()))?;

    info!("Summaries generated, sending to Discord");
    for (index, summary) in summaries.iter().enumerate() {
        let message = format_summary_message(index, summary);
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
        info!(index = index + 1, "Summary sent to Discord");
    }

    info!("All email summaries sent to Discord");
    Ok(Json(json!({ "status": "Email summaries sent to Discord successfully" })).into_response())
}

/// Relay body for one summary. The whitespace framing is part of the wire
/// contract: two leading newlines, a bold numbered subject line, then the
/// summary and three trailing newlines.
fn format_summary_message(index: usize, summary: &EmailSummary) -> String {
    format!(
        "\n\n{}. **{}**\n{}\n\n\n",
        index + 1,
        summary.subject,
        summary.summary
    )
}
