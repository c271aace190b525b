//! GET /api/leaderboard – top viewers by score.

use axum::Json;
use axum::extract::{Query, State};
use chat_games::leaderboard::TOP_LIMIT;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(q): Query<LeaderboardQuery>,
) -> ApiResult {
    let limit = q.limit.unwrap_or(TOP_LIMIT).max(1);
    let overlay = state.overlay().await;
    Ok(Json(json!({
        "leaders": overlay.leaderboard.top(limit),
        "players": overlay.leaderboard.len(),
    })))
}
