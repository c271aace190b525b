//! Client for the Gemini `generateContent` endpoint.
//!
//! Produces trivia questions and story segments from structured prompts
//! with a JSON response schema.

mod prompts;
mod request;

use std::time::Duration;

use chat_games::content::DEFAULT_TRIVIA_TOPIC;
use chat_games::{ContentSource, StorySegment, TriviaQuestion};
use futures::future::BoxFuture;

pub use prompts::{story_schema, trivia_schema};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Unified error type for the gemini-client crate.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("API key missing")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn generate_trivia_question(
        &self,
        topic: &str,
    ) -> Result<TriviaQuestion, GeminiError> {
        let topic = if topic.trim().is_empty() {
            DEFAULT_TRIVIA_TOPIC
        } else {
            topic.trim()
        };
        let question: TriviaQuestion = self
            .generate_json(&prompts::trivia_prompt(topic), trivia_schema())
            .await?;
        question
            .validate()
            .map_err(|e| GeminiError::InvalidPayload(e.to_string()))?;
        Ok(question)
    }

    pub async fn generate_story_start(&self) -> Result<StorySegment, GeminiError> {
        self.generate_json(prompts::STORY_START_PROMPT, story_schema())
            .await
    }

    pub async fn generate_story_continuation(
        &self,
        current_story: &str,
        choice: &str,
    ) -> Result<StorySegment, GeminiError> {
        self.generate_json(
            &prompts::story_continuation_prompt(current_story, choice),
            story_schema(),
        )
        .await
    }
}

/// Log a failed generation and collapse it to `None`.
fn absorb<T>(what: &'static str, result: Result<T, GeminiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, what, "Gemini generation failed");
            None
        }
    }
}

impl ContentSource for GeminiClient {
    fn trivia_question<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Option<TriviaQuestion>> {
        Box::pin(async move { absorb("trivia", self.generate_trivia_question(topic).await) })
    }

    fn story_start(&self) -> BoxFuture<'_, Option<StorySegment>> {
        Box::pin(async move { absorb("story start", self.generate_story_start().await) })
    }

    fn story_continuation<'a>(
        &'a self,
        current_story: &'a str,
        choice: &'a str,
    ) -> BoxFuture<'a, Option<StorySegment>> {
        Box::pin(async move {
            absorb(
                "story continuation",
                self.generate_story_continuation(current_story, choice).await,
            )
        })
    }
}
