//! Gemini `generateContent` client: one outbound POST per chat message.

use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Upstream call failure. The relay boundary flattens all variants into one
/// generic 500; the variants exist so the log line says what actually broke.
#[derive(Debug)]
pub enum UpstreamError {
    /// Transport-level failure (connect, TLS, timeout).
    Http(String),
    /// Upstream answered with a non-success status.
    Status(u16),
    /// Upstream body was not valid JSON.
    Body(String),
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Http(s) => write!(f, "request failed: {}", s),
            UpstreamError::Status(code) => write!(f, "upstream returned status {}", code),
            UpstreamError::Body(s) => write!(f, "malformed upstream body: {}", s),
        }
    }
}

impl std::error::Error for UpstreamError {}

/// Client for the Gemini generateContent endpoint. Holds the server-side
/// credential; nothing here ever echoes it back to callers or logs.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Send `message` and extract `candidates[0].content.parts[0].text`.
    /// A response missing any field along that path yields `Ok("")`.
    /// The message is forwarded as given; empty input is not rejected.
    pub async fn generate(&self, message: &str) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;

        Ok(extract_text(&body))
    }
}

fn extract_text(body: &GenerateResponse) -> String {
    body.candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.clone())
        .unwrap_or_default()
}
