//! Read-only Twitch chat client over the IRC WebSocket gateway.
//!
//! Logs in anonymously, joins a single channel and delivers parsed chat
//! messages through an `mpsc` channel. There is no reconnection: when the
//! socket goes away a single [`ChatEvent::Disconnected`] is sent and the
//! task ends.

mod connection;
#[cfg(test)]
mod tests;

use rand::Rng;
use tokio::sync::mpsc;

use crate::{ChatError, ChatMessage, normalize_channel};

pub const TWITCH_IRC_WS_ENDPOINT: &str = "wss://irc-ws.chat.twitch.tv:443";
const EVENT_CHANNEL_CAPACITY: usize = 256;
const ANONYMOUS_PASS: &str = "SCHMOOPIIE";
const CAPABILITIES: &str = "CAP REQ :twitch.tv/tags twitch.tv/commands";

/// Something that happened on the chat connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Login lines were sent and the channel was joined.
    Connected { channel: String },
    Message(ChatMessage),
    /// The socket closed or failed. No further events follow.
    Disconnected { reason: Option<String> },
}

/// Chat connection configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Normalized channel login used in `JOIN`.
    pub channel: String,
    /// Channel name as typed, shown in the connect notice.
    pub display_name: String,
    pub ws_url: String,
}

impl ChatConfig {
    pub fn new(raw_channel: &str) -> Result<Self, ChatError> {
        Ok(Self {
            channel: normalize_channel(raw_channel)?,
            display_name: raw_channel.trim().to_string(),
            ws_url: TWITCH_IRC_WS_ENDPOINT.to_string(),
        })
    }

    pub fn with_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    /// Lines sent right after the socket opens, in order.
    pub fn login_lines(&self, nick: &str) -> [String; 4] {
        [
            CAPABILITIES.to_string(),
            format!("PASS {ANONYMOUS_PASS}"),
            format!("NICK {nick}"),
            format!("JOIN #{}", self.channel),
        ]
    }
}

/// Handle to a running chat connection.
///
/// Dropping the handle closes the socket.
#[derive(Debug)]
pub struct ChatHandle {
    channel: String,
    shutdown_tx: mpsc::Sender<()>,
}

impl ChatHandle {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Ask the connection task to close the socket.
    pub async fn close(self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown_tx.is_closed()
    }
}

pub struct ChatClient;

impl ChatClient {
    /// Connect to a channel on the public gateway.
    pub fn connect(
        raw_channel: &str,
    ) -> Result<(mpsc::Receiver<ChatEvent>, ChatHandle), ChatError> {
        Ok(Self::connect_with(ChatConfig::new(raw_channel)?))
    }

    /// Start the connection task. Returns an event receiver and its handle.
    pub fn connect_with(config: ChatConfig) -> (mpsc::Receiver<ChatEvent>, ChatHandle) {
        let (event_tx, event_rx) = mpsc::channel::<ChatEvent>(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let handle = ChatHandle {
            channel: config.channel.clone(),
            shutdown_tx,
        };
        tokio::spawn(Self::run(config, event_tx, shutdown_rx));
        (event_rx, handle)
    }

    async fn run(
        config: ChatConfig,
        event_tx: mpsc::Sender<ChatEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let reason = match Self::connect_once(&config, &event_tx, &mut shutdown_rx).await {
            Ok(()) => {
                tracing::info!(channel = %config.channel, "Chat connection closed");
                None
            }
            Err(e) => {
                tracing::warn!(channel = %config.channel, error = %e, "Chat connection lost");
                Some(e.to_string())
            }
        };
        let _ = event_tx.send(ChatEvent::Disconnected { reason }).await;
    }
}

/// Random guest nick accepted by Twitch without a token.
pub fn anonymous_nick() -> String {
    format!("justinfan{}", rand::thread_rng().gen_range(0..100_000))
}
