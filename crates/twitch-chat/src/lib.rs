//! Anonymous Twitch chat over the IRC WebSocket gateway.
//!
//! Provides the IRC line parser, a bounded rolling message buffer and a
//! read-only chat connection that logs in as a `justinfan` guest.

pub mod buffer;
pub mod chat;
pub mod irc;

use serde::{Deserialize, Serialize};

pub use buffer::MessageBuffer;
pub use chat::{ChatClient, ChatEvent, ChatHandle};
pub use irc::{IrcLine, parse_line};

/// Fixed id of the notice pushed when a channel is joined.
pub const SYSTEM_CONNECTED_ID: &str = "system-connected";

/// A single chat line as shown on the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub message: String,
    pub color: String,
}

impl ChatMessage {
    /// Notice shown once the socket is open and the channel is joined.
    pub fn connected_notice(channel: &str) -> Self {
        Self {
            id: SYSTEM_CONNECTED_ID.to_string(),
            username: "System".to_string(),
            message: format!("Подключено к чату: {channel}"),
            color: "#00FF00".to_string(),
        }
    }
}

/// Unified error type for the twitch-chat crate.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid channel name: {0:?}")]
    InvalidChannel(String),

    #[error("chat connection closed")]
    Closed,
}

/// Normalize a user-supplied channel name into an IRC channel login.
///
/// Trims whitespace, strips a leading `#` and lowercases. Rejects empty
/// names and anything outside `[a-z0-9_]`.
pub fn normalize_channel(raw: &str) -> Result<String, ChatError> {
    let normalized = raw.trim().trim_start_matches('#').to_lowercase();
    if normalized.is_empty()
        || !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ChatError::InvalidChannel(raw.to_string()));
    }
    Ok(normalized)
}
