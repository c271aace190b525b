//! Overlay WebSocket frame types and helpers.
//!
//! Every frame is a JSON object `{"type": ..., "data": ...}`.

use serde::Serialize;
use serde_json::{Value, json};

// -- Frame type constants --

pub const CONNECTED: &str = "connected";
pub const STATE: &str = "state";
pub const CHAT_MESSAGE: &str = "chat_message";
pub const EFFECT: &str = "effect";
pub const GAME: &str = "game";
pub const PONG: &str = "pong";

// -- Payload types --

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub client_id: String,
}

/// Serialize a frame. Payloads that fail to serialize become `null`.
pub fn frame<T: Serialize>(event_type: &str, data: &T) -> String {
    let data = serde_json::to_value(data).unwrap_or(Value::Null);
    json!({ "type": event_type, "data": data }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_shape() {
        let text = frame(
            CONNECTED,
            &ConnectedPayload {
                client_id: "abc".into(),
            },
        );
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "connected");
        assert_eq!(value["data"]["clientId"], "abc");
    }
}
