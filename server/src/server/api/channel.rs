//! Chat channel control:
//!   POST   /api/channel – join a channel (replaces the current one)
//!   DELETE /api/channel – leave the channel

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;
use crate::services::chat_pump;

use super::{ApiResult, err_json};

#[derive(Debug, Deserialize)]
pub struct ChannelRequest {
    pub channel: String,
}

/// POST /api/channel
pub async fn connect_channel(
    State(state): State<SharedState>,
    Json(body): Json<ChannelRequest>,
) -> ApiResult {
    let channel = chat_pump::connect(&state, &body.channel)
        .await
        .map_err(|e| err_json(400, &e.to_string()))?;
    Ok(Json(json!({ "status": "ok", "channel": channel })))
}

/// DELETE /api/channel
pub async fn disconnect_channel(State(state): State<SharedState>) -> ApiResult {
    let channel = chat_pump::disconnect(&state).await;
    Ok(Json(json!({ "status": "ok", "channel": channel })))
}
