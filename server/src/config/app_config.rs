//! Runtime application configuration resolved from the settings snapshot.

use chat_games::session::SessionTimers;
use gemini_client::GeminiConfig;

use super::manager::SettingsManager;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub trivia_topic: String,
    pub default_channel: Option<String>,
    pub trivia_seconds: u32,
    pub story_vote_seconds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            gemini_api_key: String::new(),
            gemini_model: gemini_client::DEFAULT_MODEL.into(),
            gemini_base_url: gemini_client::DEFAULT_BASE_URL.into(),
            trivia_topic: chat_games::content::DEFAULT_TRIVIA_TOPIC.into(),
            default_channel: None,
            trivia_seconds: chat_games::trivia::ROUND_SECONDS,
            story_vote_seconds: chat_games::story::VOTE_SECONDS,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let defaults = Self::default();

        let default_channel = g("DEFAULT_CHANNEL");

        Ok(Self {
            server_port: parse_u16(&g("SERVER_PORT"), defaults.server_port),
            gemini_api_key: g("GEMINI_API_KEY"),
            gemini_model: non_empty(g("GEMINI_MODEL"), defaults.gemini_model),
            gemini_base_url: non_empty(g("GEMINI_BASE_URL"), defaults.gemini_base_url),
            trivia_topic: non_empty(g("TRIVIA_TOPIC"), defaults.trivia_topic),
            default_channel: (!default_channel.trim().is_empty())
                .then(|| default_channel.trim().to_string()),
            trivia_seconds: parse_u32(&g("TRIVIA_SECONDS"), defaults.trivia_seconds),
            story_vote_seconds: parse_u32(&g("STORY_VOTE_SECONDS"), defaults.story_vote_seconds),
        })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::load(&SettingsManager::from_env())
    }

    pub fn timers(&self) -> SessionTimers {
        SessionTimers {
            trivia_seconds: self.trivia_seconds,
            story_vote_seconds: self.story_vote_seconds,
        }
    }

    /// Gemini client settings, or `None` when no key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        if self.gemini_api_key.is_empty() {
            return None;
        }
        let mut config = GeminiConfig::new(self.gemini_api_key.clone());
        config.model = self.gemini_model.clone();
        config.base_url = self.gemini_base_url.trim_end_matches('/').to_string();
        Some(config)
    }
}

fn non_empty(value: String, default: String) -> String {
    if value.trim().is_empty() { default } else { value }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u32(s: &str, default: u32) -> u32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
