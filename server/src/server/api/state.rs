//! GET /api/state – full overlay snapshot.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::app::SharedState;

use super::{ApiResult, err_json};

pub async fn get_state(State(state): State<SharedState>) -> ApiResult {
    let snapshot = state.overlay().await.snapshot();
    let value: Value = serde_json::to_value(snapshot)
        .map_err(|e| err_json(500, &format!("Failed to serialize state: {e}")))?;
    Ok(Json(value))
}
