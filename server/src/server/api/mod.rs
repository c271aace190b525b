//! REST API handlers grouped by domain.

pub mod channel;
pub mod chat;
pub mod games;
pub mod leaderboard;
pub mod logs;
pub mod settings;
pub mod state;

use axum::Json;
use axum::http::StatusCode;
use chat_games::GameError;
use serde_json::{Value, json};

pub type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map a game rule violation to an HTTP error.
pub fn game_err(e: GameError) -> (StatusCode, Json<Value>) {
    let status = match e {
        GameError::InvalidQuestion(_) | GameError::InvalidPoll => 400,
        GameError::WrongGame { .. } | GameError::Busy => 409,
    };
    err_json(status, &e.to_string())
}
