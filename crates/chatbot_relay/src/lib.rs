//! Chat relay library (config, wire types, Gemini upstream client, routes).
//! Used by the `chatbot-relay` server binary and the desktop GUI.

pub mod config;
pub mod messages;
pub mod routes;
pub mod upstream;

pub use config::{default_config_path, Config, ConfigError, ServerSection, UpstreamSection};
pub use messages::{ChatRequest, ChatResponse, ErrorResponse, GENERIC_ERROR};
pub use routes::{create_relay_routes, router, AppState};
pub use upstream::{GeminiClient, UpstreamError};
