use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// One failed field from request validation, serialized into 400 bodies.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request parameters: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Authorization token is required")]
    MissingAuth,

    #[error("No emails found")]
    NoEmails,

    /// A dependency answered with a non-success status. The status and
    /// message travel to the caller unchanged.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Catch-all. The detail is logged, never sent to the caller.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingAuth => StatusCode::UNAUTHORIZED,
            ApiError::NoEmails => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The exact body the HTTP layer emits for this error. Composite
    /// handlers embed this text when they forward a sub-call's failure.
    pub fn body_text(&self) -> String {
        match self {
            ApiError::Validation(errors) => json!({ "error": errors }).to_string(),
            ApiError::MissingAuth => "Authorization token is required".to_string(),
            ApiError::NoEmails => "No emails found".to_string(),
            ApiError::Upstream { message, .. } => json!({ "error": message }).to_string(),
            ApiError::Internal(_) => json!({ "error": "Internal server error" }).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        match self {
            ApiError::Validation(errors) => {
                (status, Json(json!({ "error": errors }))).into_response()
            }
            ApiError::MissingAuth => (status, "Authorization token is required").into_response(),
            ApiError::NoEmails => (status, "No emails found").into_response(),
            ApiError::Upstream { message, .. } => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(_) => {
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Internal(error.to_string())
    }
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
