use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::{api, assets, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        .route("/api/state", get(api::state::get_state))
        // --- Channel & chat ---
        .route(
            "/api/channel",
            post(api::channel::connect_channel).delete(api::channel::disconnect_channel),
        )
        .route("/api/chat/messages", get(api::chat::get_messages))
        .route("/api/chat/clear", post(api::chat::clear_messages))
        .route("/api/leaderboard", get(api::leaderboard::get_leaderboard))
        // --- Games ---
        .route("/api/games", axum::routing::delete(api::games::exit_game))
        .route("/api/games/trivia/start", post(api::games::start_trivia))
        .route("/api/games/tug-of-war/reset", post(api::games::reset_tug_of_war))
        .route("/api/games/story/start", post(api::games::start_story))
        .route("/api/games/poll/start", post(api::games::start_poll))
        .route("/api/games/poll/stop", post(api::games::stop_poll))
        .route("/api/games/poll/reset", post(api::games::reset_poll))
        .route("/api/games/{game}", post(api::games::select_game))
        // --- Settings ---
        .route("/api/settings", get(api::settings::get_settings))
        .route("/api/settings/reload", post(api::settings::reload_settings))
        // --- Logs ---
        .route("/api/logs", get(api::logs::get_logs))
        .route("/api/logs/clear", post(api::logs::clear_logs))
        // --- Overlay static files ---
        .route("/overlay/", get(assets::overlay_index))
        .route("/overlay/{*path}", get(assets::overlay_handler))
        .route("/", get(assets::overlay_index))
        .fallback(assets::overlay_fallback)
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
