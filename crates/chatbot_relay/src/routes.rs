//! Axum routes for the relay HTTP surface.
//! One endpoint: `POST /api/chat` (forward, extract, answer).

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::messages::{ChatRequest, ChatResponse, ErrorResponse};
use crate::upstream::GeminiClient;

/// Shared handler state: just the upstream client. The relay itself holds no
/// per-request or per-session state.
#[derive(Clone)]
pub struct AppState {
    pub upstream: GeminiClient,
}

pub fn create_relay_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(handle_chat))
}

/// Build the full application router for `state`.
pub fn router(state: AppState) -> Router {
    create_relay_routes().with_state(state)
}

/// `POST /api/chat`: body `{"message": ...}` in, `{"response": ...}` out.
/// Every failure mode (unreadable request body, transport, upstream status,
/// malformed upstream body) becomes the same `500 {"error": ...}`; the
/// specifics go to the log only.
async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::error!(error = %rejection, "unreadable chat request body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::generic()),
            )
                .into_response();
        }
    };

    match state.upstream.generate(&req.message).await {
        Ok(text) => (StatusCode::OK, Json(ChatResponse { response: text })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::generic()),
            )
                .into_response()
        }
    }
}
