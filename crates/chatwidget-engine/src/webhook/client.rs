use std::time::Duration;

use serde_json::Value;
use ureq::Agent;

use super::{Assistant, WebhookError, WebhookRequest, extract_reply};

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Blocking HTTP client for the assistant webhook.
pub struct WebhookClient {
    agent: Agent,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: url.to_owned(),
        }
    }

    pub fn with_default_timeout(url: &str) -> Self {
        Self::new(url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Assistant for WebhookClient {
    fn ask(&self, request: &WebhookRequest) -> Result<String, WebhookError> {
        log::info!(
            "Sending message for session {} (language {})",
            request.session_id,
            request.language
        );

        let response = self
            .agent
            .post(&self.url)
            .header("Accept", "application/json")
            .send_json(request)?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WebhookError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body: Value = body_reader.read_json()?;
        extract_reply(&body).ok_or(WebhookError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;

    #[test]
    fn unreachable_backend_is_a_request_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = WebhookClient::new("http://127.0.0.1:9/webhook", Duration::from_secs(2));
        let request = WebhookRequest::new("hi", &SessionId::new("s"), "en", "test");
        assert!(matches!(
            client.ask(&request),
            Err(WebhookError::HttpRequest(_))
        ));
    }

    #[test]
    fn keeps_configured_url() {
        let client = WebhookClient::with_default_timeout("https://example.test/hook");
        assert_eq!(client.url(), "https://example.test/hook");
    }
}
