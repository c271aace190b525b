//! Log viewing API backed by the in-memory capture layer.

use axum::Json;
use axum::extract::Query;
use serde::Deserialize;
use serde_json::json;

use crate::services::log_buffer;

use super::ApiResult;

const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<usize>,
    /// Minimum level: trace, debug, info, warn or error.
    pub level: Option<String>,
}

/// GET /api/logs
pub async fn get_logs(Query(q): Query<LogQuery>) -> ApiResult {
    let limit = q.limit.unwrap_or(DEFAULT_LIMIT);
    let logs = log_buffer::recent(limit, q.level.as_deref());
    Ok(Json(json!({
        "count": logs.len(),
        "logs": logs,
        "limit": limit,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// POST /api/logs/clear
pub async fn clear_logs() -> ApiResult {
    let cleared = log_buffer::clear();
    Ok(Json(json!({ "status": "ok", "cleared": cleared })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::api::test_util::ok_body;
    use crate::services::log_buffer::{TEST_LOCK, push_for_test};

    #[tokio::test]
    async fn logs_filter_and_clear() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        log_buffer::clear();
        push_for_test("info", "Chat connected");
        push_for_test("error", "Gemini request failed");

        let body = ok_body(
            get_logs(Query(LogQuery {
                limit: None,
                level: Some("warn".into()),
            }))
            .await,
        );
        assert_eq!(body["count"], 1);
        assert_eq!(body["logs"][0]["message"], "Gemini request failed");
        assert_eq!(body["limit"], 100);

        let body = ok_body(clear_logs().await);
        assert_eq!(body["cleared"], 2);
    }
}
