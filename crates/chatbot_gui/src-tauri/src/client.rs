//! HTTP client for the relay: one `POST /api/chat` per message.

use chatbot_relay::messages::{ChatRequest, ChatResponse, ErrorResponse};
use reqwest::Client;

/// Relay call failure. Network errors, non-2xx relay responses, and
/// unparseable bodies all land here; callers only distinguish success from
/// failure.
#[derive(Debug)]
pub struct RelayError(pub String);

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RelayError {}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError(e.to_string())
    }
}

/// Client bound to one relay base URL (e.g. `http://127.0.0.1:8787`).
#[derive(Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message and return the generated text. The returned text may
    /// be empty; that is a success, not a failure.
    pub async fn send_message(&self, message: &str) -> Result<String, RelayError> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Surface the relay's error text when the body parses.
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("relay returned status {}", status),
            };
            return Err(RelayError(message));
        }

        let body: ChatResponse = response.json().await.map_err(RelayError::from)?;
        Ok(body.response)
    }
}
