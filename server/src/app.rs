use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chat_games::effects::SmileRain;
use chat_games::leaderboard::TOP_LIMIT;
use chat_games::session::{GameSession, GameView};
use chat_games::{ContentSource, GameType, Leaderboard, NoContent, ViewerStats};
use gemini_client::GeminiClient;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, RwLock, broadcast};
use tokio_util::sync::CancellationToken;
use twitch_chat::{ChatHandle, ChatMessage, MessageBuffer};

use crate::config::{AppConfig, SettingsManager};
use crate::events;

const WS_CHANNEL_CAPACITY: usize = 2048;

/// Everything the overlay draws, mutated by the chat pump, the game clock and the API.
#[derive(Debug)]
pub struct Overlay {
    pub channel: Option<String>,
    pub connected: bool,
    pub buffer: MessageBuffer,
    pub leaderboard: Leaderboard,
    pub session: GameSession,
    pub smiles: SmileRain,
}

impl Overlay {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            channel: None,
            connected: false,
            buffer: MessageBuffer::new(),
            leaderboard: Leaderboard::new(),
            session: GameSession::new(config.timers()),
            smiles: SmileRain::new(),
        }
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            channel: self.channel.clone(),
            connected: self.connected,
            messages: self.buffer.messages(),
            latest_message: self.buffer.latest().cloned(),
            leaderboard: self.leaderboard.top(TOP_LIMIT),
            current_game: self.session.current(),
            game: self.session.view(),
            smile_triggers: self.smiles.trigger_count(),
        }
    }
}

/// Serialized form of [`Overlay`] sent in `state` frames and `GET /api/state`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub channel: Option<String>,
    pub connected: bool,
    pub messages: Vec<ChatMessage>,
    pub latest_message: Option<ChatMessage>,
    pub leaderboard: Vec<ViewerStats>,
    pub current_game: GameType,
    pub game: GameView,
    pub smile_triggers: u64,
}

/// Application shared state accessible from axum handlers and background tasks.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for overlay WebSocket frames
    ws_tx: broadcast::Sender<String>,
    /// Settings snapshot and the config derived from it (reloadable)
    settings: RwLock<SettingsManager>,
    config: RwLock<AppConfig>,
    overlay: Mutex<Overlay>,
    /// Live chat connection, tagged with the id its pump task carries
    chat: Mutex<Option<(u64, ChatHandle)>>,
    chat_seq: AtomicU64,
    content: RwLock<Arc<dyn ContentSource>>,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Build state from a settings snapshot, choosing the content source from its config.
    pub fn new(settings: SettingsManager) -> Result<Self, anyhow::Error> {
        let config = AppConfig::load(&settings)?;
        let content = content_source(&config);
        Ok(Self::with_content(settings, config, content))
    }

    pub fn with_content(
        settings: SettingsManager,
        config: AppConfig,
        content: Arc<dyn ContentSource>,
    ) -> Self {
        let (ws_tx, _) = broadcast::channel(WS_CHANNEL_CAPACITY);
        let overlay = Overlay::new(&config);

        Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                settings: RwLock::new(settings),
                config: RwLock::new(config),
                overlay: Mutex::new(overlay),
                chat: Mutex::new(None),
                chat_seq: AtomicU64::new(0),
                content: RwLock::new(content),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub async fn server_port(&self) -> u16 {
        self.config().await.server_port
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    /// Send a frame to every overlay client. No clients is not an error.
    pub fn broadcast(&self, frame: String) {
        let _ = self.inner.ws_tx.send(frame);
    }

    pub fn broadcast_all(&self, frames: Vec<String>) {
        for frame in frames {
            self.broadcast(frame);
        }
    }

    pub async fn broadcast_state(&self) {
        let snapshot = self.overlay().await.snapshot();
        self.broadcast(events::frame(events::STATE, &snapshot));
    }

    pub async fn broadcast_game(&self) {
        let view = self.overlay().await.session.view();
        self.broadcast(events::frame(events::GAME, &view));
    }

    pub async fn overlay(&self) -> MutexGuard<'_, Overlay> {
        self.inner.overlay.lock().await
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    pub async fn settings(&self) -> tokio::sync::RwLockReadGuard<'_, SettingsManager> {
        self.inner.settings.read().await
    }

    pub async fn content(&self) -> Arc<dyn ContentSource> {
        self.inner.content.read().await.clone()
    }

    /// Re-read settings from the environment and rebuild the content source.
    ///
    /// Timers apply to games selected afterwards; the port needs a restart.
    pub async fn reload_config(&self) -> Result<(), anyhow::Error> {
        crate::bootstrap::load_dotenv();
        let settings = SettingsManager::from_env();
        let config = AppConfig::load(&settings)?;

        *self.inner.content.write().await = content_source(&config);
        self.overlay().await.session.set_timers(config.timers());
        *self.inner.config.write().await = config;
        *self.inner.settings.write().await = settings;
        Ok(())
    }

    /// Store a new chat handle and return its id. The previous handle is returned for closing.
    pub async fn replace_chat(&self, handle: ChatHandle) -> (u64, Option<ChatHandle>) {
        let id = self.inner.chat_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self.inner.chat.lock().await.replace((id, handle));
        (id, previous.map(|(_, h)| h))
    }

    pub async fn take_chat(&self) -> Option<ChatHandle> {
        self.inner.chat.lock().await.take().map(|(_, h)| h)
    }

    /// True while `id` names the connection currently stored.
    pub async fn is_current_chat(&self, id: u64) -> bool {
        matches!(&*self.inner.chat.lock().await, Some((current, _)) if *current == id)
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }
}

/// Gemini when a key is configured, otherwise a source that never has content.
fn content_source(config: &AppConfig) -> Arc<dyn ContentSource> {
    let Some(gemini) = config.gemini() else {
        tracing::warn!("GEMINI_API_KEY not set; trivia and story will not load content");
        return Arc::new(NoContent);
    };
    match GeminiClient::new(gemini) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini client ready");
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!("Failed to build Gemini client: {e}");
            Arc::new(NoContent)
        }
    }
}


#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chat_games::{StorySegment, TriviaQuestion};
    use futures::future::BoxFuture;

    /// Content source with fixed answers.
    pub struct FixedContent {
        pub trivia: Option<TriviaQuestion>,
        pub story: Option<StorySegment>,
    }

    impl ContentSource for FixedContent {
        fn trivia_question<'a>(
            &'a self,
            _topic: &'a str,
        ) -> BoxFuture<'a, Option<TriviaQuestion>> {
            Box::pin(async move { self.trivia.clone() })
        }

        fn story_start(&self) -> BoxFuture<'_, Option<StorySegment>> {
            Box::pin(async move { self.story.clone() })
        }

        fn story_continuation<'a>(
            &'a self,
            _current_story: &'a str,
            _choice: &'a str,
        ) -> BoxFuture<'a, Option<StorySegment>> {
            Box::pin(async move { self.story.clone() })
        }
    }

    pub fn sample_question() -> TriviaQuestion {
        TriviaQuestion {
            question: "Capital of France?".into(),
            options: vec!["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()],
            correct_answer_index: 0,
            difficulty: chat_games::Difficulty::Easy,
        }
    }

    pub fn sample_segment() -> StorySegment {
        StorySegment {
            text: "A door creaks open.".into(),
            option_a: "Enter".into(),
            option_b: "Run".into(),
        }
    }

    pub fn state_with(content: Arc<dyn ContentSource>) -> SharedState {
        SharedState::with_content(SettingsManager::default(), AppConfig::default(), content)
    }

    pub fn fixed_state() -> SharedState {
        state_with(Arc::new(FixedContent {
            trivia: Some(sample_question()),
            story: Some(sample_segment()),
        }))
    }

    pub fn empty_state() -> SharedState {
        state_with(Arc::new(NoContent))
    }

    pub fn chat(username: &str, message: &str) -> ChatMessage {
        ChatMessage {
            id: format!("{username}-{message}"),
            username: username.into(),
            message: message.into(),
            color: "#FF4500".into(),
        }
    }
}
