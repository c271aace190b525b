//! Chat feed API:
//!   GET  /api/chat/messages – buffered messages, oldest first
//!   POST /api/chat/clear    – empty the buffer

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;

use super::ApiResult;

/// GET /api/chat/messages
pub async fn get_messages(State(state): State<SharedState>) -> ApiResult {
    let messages = state.overlay().await.buffer.messages();
    Ok(Json(json!({
        "messages": messages,
        "count": messages.len(),
    })))
}

/// POST /api/chat/clear
pub async fn clear_messages(State(state): State<SharedState>) -> ApiResult {
    let cleared = state.overlay().await.buffer.clear();
    tracing::info!(cleared, "Chat buffer cleared");
    state.broadcast_state().await;
    Ok(Json(json!({ "status": "ok", "cleared": cleared })))
}
