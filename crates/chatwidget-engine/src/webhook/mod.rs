//! Webhook transport to the assistant backend.
//!
//! One JSON POST per user message; the reply text is read from the first
//! non-empty `output`, `message` or `response` field of the JSON answer.

mod client;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::session::SessionId;

pub use client::WebhookClient;

/// Error from asking the assistant backend.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// HTTP request failed (network error, timeout, unreadable body).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse { status: u16, body: String },

    /// The answer carried no reply text.
    #[error("assistant response contained no reply text")]
    EmptyReply,
}

/// Payload posted to the webhook for every user message.
///
/// The language code is repeated under `language`, `userLanguage` and
/// `locale` because backend workflows read different keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub chat_input: String,
    pub session_id: String,
    /// RFC 3339 with milliseconds, UTC.
    pub timestamp: String,
    pub language: String,
    pub user_language: String,
    pub locale: String,
    pub context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub website_language: String,
    pub preferred_language: String,
    pub source: String,
}

impl WebhookRequest {
    pub fn new(message: &str, session_id: &SessionId, language: &str, source: &str) -> Self {
        Self {
            chat_input: message.to_string(),
            session_id: session_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            language: language.to_string(),
            user_language: language.to_string(),
            locale: language.to_string(),
            context: RequestContext {
                website_language: language.to_string(),
                preferred_language: language.to_string(),
                source: source.to_string(),
            },
        }
    }
}

/// Something that answers chat messages.
pub trait Assistant {
    fn ask(&self, request: &WebhookRequest) -> Result<String, WebhookError>;
}

impl<F> Assistant for F
where
    F: Fn(&WebhookRequest) -> Result<String, WebhookError>,
{
    fn ask(&self, request: &WebhookRequest) -> Result<String, WebhookError> {
        self(request)
    }
}

/// Picks the reply text out of a webhook answer.
///
/// Some workflows wrap the answer object in a one-element array; the first
/// element is used then.
pub fn extract_reply(body: &Value) -> Option<String> {
    let body = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };

    ["output", "message", "response"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
