//! Gmail REST API client module
//!
//! Message search plus per-message detail, and the payload-decoding helpers
//! that turn a raw message into subject and plain text.
//!
//! The search call never consults the upstream HTTP status: a response body
//! without a `messages` array reads as zero matches, whatever the status was.

use base64::Engine;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ApiError;

/// URL-safe alphabet, padded or not. This is what the API emits.
const BASE64_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Fallback for standard-alphabet payloads.
const BASE64_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One email, reshaped for this service's callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailItem {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub message: String,
}

/// A search hit. Identifiers only, no content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Option<Vec<MessageRef>>,
}

#[derive(Debug, Deserialize)]
pub struct MessageDetail {
    pub payload: MessagePayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub body: Option<MessageBody>,
    #[serde(default)]
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub mime_type: String,
    #[serde(default)]
    pub body: Option<MessageBody>,
}

#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
}

impl GmailClient {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Search for unread messages under a label. `token` is the raw
    /// Authorization header value received from the caller, forwarded
    /// verbatim behind a `Bearer ` prefix.
    pub async fn search_messages(
        &self,
        token: &str,
        label: &str,
        quantity: u32,
    ) -> Result<Vec<MessageRef>, ApiError> {
        // `is:unread` rides as a bare query key; the API tolerates it.
        let url = format!(
            "{}/gmail/v1/users/me/messages?q=label:{}&is:unread&maxResults={}",
            self.base_url, label, quantity
        );
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        let list: MessageList = response.json().await?;
        Ok(list.messages.unwrap_or_default())
    }

    /// Full detail for one search hit.
    pub async fn message_detail(&self, token: &str, id: &str) -> Result<MessageDetail, ApiError> {
        let url = format!(
            "{}/gmail/v1/users/me/messages/{}?format=full",
            self.base_url, id
        );
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

/// First header literally named `Subject`, else a fixed fallback. An empty
/// subject value counts as missing.
pub fn subject_from_headers(headers: &[Header]) -> String {
    headers
        .iter()
        .find(|header| header.name == "Subject")
        .map(|header| header.value.clone())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "No Subject".to_string())
}

/// Decoded text body. Prefers the top-level payload body, then the first
/// `text/plain` part one level deep, else empty.
pub fn body_from_payload(payload: &MessagePayload) -> String {
    if let Some(data) = payload
        .body
        .as_ref()
        .and_then(|body| body.data.as_deref())
        .filter(|data| !data.is_empty())
    {
        return decode_body_data(data);
    }
    if let Some(parts) = payload.parts.as_ref() {
        let plain = parts.iter().find(|part| part.mime_type == "text/plain");
        if let Some(data) = plain
            .and_then(|part| part.body.as_ref())
            .and_then(|body| body.data.as_deref())
            .filter(|data| !data.is_empty())
        {
            return decode_body_data(data);
        }
    }
    String::new()
}

/// Lenient decode: URL-safe alphabet first, then standard. Undecodable
/// input becomes an empty string rather than an error.
fn decode_body_data(data: &str) -> String {
    let bytes = BASE64_URL_SAFE
        .decode(data)
        .or_else(|_| BASE64_STANDARD.decode(data));
    match bytes {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => {
            warn!("Undecodable message body: {}", error);
            String::new()
        }
    }
}
