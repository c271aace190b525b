//! Recent tracing events kept in memory for the log API.

use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

pub const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
    pub fields: Map<String, Value>,
    #[serde(skip)]
    severity: u8,
}

static ENTRIES: LazyLock<Mutex<VecDeque<LogEntry>>> =
    LazyLock::new(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)));

/// Higher is more severe. Unknown names rank as trace.
fn severity(level: &str) -> u8 {
    match level.to_ascii_lowercase().as_str() {
        "error" => 4,
        "warn" | "warning" => 3,
        "info" => 2,
        "debug" => 1,
        _ => 0,
    }
}

/// Newest `limit` entries at or above `min_level`, oldest first.
pub fn recent(limit: usize, min_level: Option<&str>) -> Vec<LogEntry> {
    let safe_limit = limit.clamp(1, MAX_LOG_ENTRIES);
    let floor = min_level.map(severity).unwrap_or(0);
    let Ok(entries) = ENTRIES.lock() else {
        return Vec::new();
    };

    let mut logs = entries
        .iter()
        .rev()
        .filter(|e| e.severity >= floor)
        .take(safe_limit)
        .cloned()
        .collect::<Vec<_>>();
    logs.reverse();
    logs
}

pub fn clear() -> usize {
    let Ok(mut entries) = ENTRIES.lock() else {
        return 0;
    };
    let cleared = entries.len();
    entries.clear();
    cleared
}

fn push(entry: LogEntry) {
    let Ok(mut entries) = ENTRIES.lock() else {
        return;
    };
    if entries.len() >= MAX_LOG_ENTRIES {
        entries.pop_front();
    }
    entries.push_back(entry);
}

/// Layer that copies every event into the in-memory buffer.
#[derive(Default)]
pub struct LogCaptureLayer;

impl LogCaptureLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for LogCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let message = visitor.message.unwrap_or_else(|| meta.name().to_string());

        push(LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: meta.level().to_string().to_lowercase(),
            target: meta.target().to_string(),
            message,
            fields: visitor.fields,
            severity: severity(meta.level().as_str()),
        });
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn record_field_value(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            return;
        }
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_field_value(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_field_value(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_field_value(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_field_value(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_field_value(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_field_value(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_field_value(field, Value::from(format!("{value:?}")));
    }
}

#[cfg(test)]
pub(crate) static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[cfg(test)]
pub(crate) fn push_for_test(level: &str, message: &str) {
    push(LogEntry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.to_string(),
        target: "test".to_string(),
        message: message.to_string(),
        fields: Map::new(),
        severity: severity(level),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn clear_returns_removed_count() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        push_for_test("info", "a");
        push_for_test("info", "b");

        let removed = clear();
        assert!(removed >= 2);
        assert!(recent(10, None).is_empty());
    }

    #[test]
    fn recent_applies_limit_and_level() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        for idx in 0..5 {
            push_for_test("info", &format!("m{idx}"));
        }
        push_for_test("warn", "w");
        push_for_test("debug", "d");

        let logs = recent(3, None);
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].message, "m4");
        assert_eq!(logs[2].message, "d");

        let warnings = recent(100, Some("warn"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "w");
    }

    #[test]
    fn buffer_is_bounded() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        for idx in 0..(MAX_LOG_ENTRIES + 5) {
            push_for_test("info", &format!("m{idx}"));
        }
        let logs = recent(MAX_LOG_ENTRIES, None);
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "m5");
        clear();
    }

    #[test]
    fn layer_captures_message_and_fields() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        let subscriber = tracing_subscriber::registry().with(LogCaptureLayer::new());
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(channel = "shroud", attempts = 3u64, "Chat connection lost");
        });

        let logs = recent(10, None);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, "warn");
        assert_eq!(logs[0].message, "Chat connection lost");
        assert_eq!(logs[0].fields["channel"], "shroud");
        assert_eq!(logs[0].fields["attempts"], 3);
        clear();
    }
}
