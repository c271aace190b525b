//! Settings API:
//!   GET  /api/settings        – all settings (secrets masked) + feature status
//!   POST /api/settings/reload – re-read the environment and `.env`

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, err_json};

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    let sm = state.settings().await;
    let mut settings: Vec<_> = sm.get_all_settings().into_values().collect();
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(Json(json!({
        "settings": settings,
        "status": sm.check_feature_status(),
    })))
}

/// POST /api/settings/reload
pub async fn reload_settings(State(state): State<SharedState>) -> ApiResult {
    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;
    let status = state.settings().await.check_feature_status();
    tracing::info!("Settings reloaded");
    Ok(Json(json!({ "status": "ok", "features": status })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::state_with;
    use crate::config::{AppConfig, SettingsManager};
    use crate::server::api::test_util::ok_body;
    use chat_games::NoContent;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn secrets_are_masked_and_sorted() {
        let values = HashMap::from([("GEMINI_API_KEY".to_string(), "hunter2".to_string())]);
        let state = SharedState::with_content(
            SettingsManager::new(values),
            AppConfig::default(),
            Arc::new(NoContent),
        );

        let body = ok_body(get_settings(State(state)).await);
        let settings = body["settings"].as_array().unwrap();
        let keys: Vec<&str> = settings.iter().map(|s| s["key"].as_str().unwrap()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let api_key = settings.iter().find(|s| s["key"] == "GEMINI_API_KEY").unwrap();
        assert_ne!(api_key["value"], "hunter2");
        assert_eq!(api_key["type"], "secret");
        assert_eq!(api_key["has_value"], true);
        assert_eq!(body["status"]["gemini_configured"], true);
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let body = ok_body(get_settings(State(state_with(Arc::new(NoContent)))).await);
        assert_eq!(body["status"]["gemini_configured"], false);
        assert_eq!(body["status"]["missing_settings"][0], "GEMINI_API_KEY");
    }
}
