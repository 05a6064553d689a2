/// Agent chat relay endpoint
///
/// Streams the agent's reply as plain text, chunk by chunk, in the order the
/// upstream produced it.

use crate::chat::relay::{ChatRequest, RelayError};
use crate::server::AppState;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use futures::TryStreamExt;

pub fn create_chat_routes() -> Router<AppState> {
    Router::new().route("/api/agents/chat", post(agent_chat))
}

/// Relay a chat turn to the agent's model
///
/// POST /api/agents/chat
/// Body: { "agentId": "...", "message": "...", "conversationHistory": [{ "role": "user", "content": "..." }] }
async fn agent_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    // Malformed bodies get the same plain-text 400 as missing fields
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!("⚠️ Rejected chat body: {}", rejection.body_text());
        RelayError::MissingFields
    })?;
    let agent_id = request.agent_id.clone().unwrap_or_default();
    let chunks = state.relay.relay(request).await?;

    let body = Body::from_stream(chunks.inspect_err(move |e| {
        tracing::error!("❌ Chat stream for agent {} ended early: {}", agent_id, e);
    }));
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response())
}
