//! Wire types for the relay HTTP surface. Client ↔ relay JSON.

use serde::{Deserialize, Serialize};

/// Fixed error text returned for every relay failure. Transport errors,
/// upstream rejections, and malformed upstream bodies all collapse into this
/// one message; the distinction only reaches the tracing log.
pub const GENERIC_ERROR: &str = "Failed to process your request";

/// Client → relay: a single chat message. Forwarded verbatim, including
/// empty strings; the relay performs no validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Relay → client: the generated text. May be empty when the upstream
/// response carries no candidate text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Relay → client: generic failure body, always paired with HTTP 500.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn generic() -> Self {
        Self {
            error: GENERIC_ERROR.to_string(),
        }
    }
}
