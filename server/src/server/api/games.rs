//! Game control API:
//!   POST   /api/games/{game}             – select a game with fresh state
//!   DELETE /api/games                    – back to the game menu
//!   POST   /api/games/trivia/start       – request a new question
//!   POST   /api/games/tug-of-war/reset   – restart the rope at 50
//!   POST   /api/games/story/start        – request an opening segment
//!   POST   /api/games/poll/start         – open a poll
//!   POST   /api/games/poll/stop          – close voting, keep results
//!   POST   /api/games/poll/reset         – clear votes

use axum::Json;
use axum::extract::{Path, State};
use chat_games::GameType;
use chat_games::poll::DEFAULT_OPTIONS;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::services::generation;

use super::{ApiResult, err_json, game_err};

fn game_body(view: &chat_games::session::GameView) -> Value {
    json!({ "status": "ok", "game": view })
}

/// POST /api/games/{game}
pub async fn select_game(State(state): State<SharedState>, Path(slug): Path<String>) -> ApiResult {
    let game = GameType::from_slug(&slug)
        .ok_or_else(|| err_json(404, &format!("Unknown game: {slug}")))?;
    let view = {
        let mut overlay = state.overlay().await;
        overlay.session.select(game);
        overlay.session.view()
    };
    state.broadcast_state().await;
    Ok(Json(game_body(&view)))
}

/// DELETE /api/games
pub async fn exit_game(State(state): State<SharedState>) -> ApiResult {
    let view = {
        let mut overlay = state.overlay().await;
        overlay.session.exit();
        overlay.session.view()
    };
    state.broadcast_state().await;
    Ok(Json(game_body(&view)))
}

/// POST /api/games/trivia/start
pub async fn start_trivia(State(state): State<SharedState>) -> ApiResult {
    generation::start_trivia(&state).await.map_err(game_err)?;
    Ok(Json(json!({ "status": "loading" })))
}

/// POST /api/games/tug-of-war/reset
pub async fn reset_tug_of_war(State(state): State<SharedState>) -> ApiResult {
    let view = {
        let mut overlay = state.overlay().await;
        overlay.session.tug_of_war_mut().map_err(game_err)?.reset();
        overlay.session.view()
    };
    state.broadcast_game().await;
    Ok(Json(game_body(&view)))
}

/// POST /api/games/story/start
pub async fn start_story(State(state): State<SharedState>) -> ApiResult {
    generation::start_story(&state).await.map_err(game_err)?;
    Ok(Json(json!({ "status": "loading" })))
}

#[derive(Debug, Deserialize)]
pub struct PollRequest {
    pub question: String,
    #[serde(default)]
    pub options: Option<String>,
}

/// POST /api/games/poll/start
pub async fn start_poll(
    State(state): State<SharedState>,
    Json(body): Json<PollRequest>,
) -> ApiResult {
    let options = body.options.as_deref().unwrap_or(DEFAULT_OPTIONS);
    let view = {
        let mut overlay = state.overlay().await;
        overlay
            .session
            .poll_mut()
            .map_err(game_err)?
            .start(&body.question, options)
            .map_err(game_err)?;
        overlay.session.view()
    };
    state.broadcast_game().await;
    Ok(Json(game_body(&view)))
}

/// POST /api/games/poll/stop
pub async fn stop_poll(State(state): State<SharedState>) -> ApiResult {
    let view = {
        let mut overlay = state.overlay().await;
        overlay.session.poll_mut().map_err(game_err)?.stop();
        overlay.session.view()
    };
    state.broadcast_game().await;
    Ok(Json(game_body(&view)))
}

/// POST /api/games/poll/reset
pub async fn reset_poll(State(state): State<SharedState>) -> ApiResult {
    let view = {
        let mut overlay = state.overlay().await;
        overlay.session.poll_mut().map_err(game_err)?.reset();
        overlay.session.view()
    };
    state.broadcast_game().await;
    Ok(Json(game_body(&view)))
}
