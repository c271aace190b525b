//! Source of generated trivia questions and story segments.
//!
//! Failures are reduced to `None`; callers treat that as "nothing to show".

use futures::future::BoxFuture;

use crate::{StorySegment, TriviaQuestion};

pub const DEFAULT_TRIVIA_TOPIC: &str = "general knowledge";

pub trait ContentSource: Send + Sync {
    fn trivia_question<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Option<TriviaQuestion>>;

    fn story_start(&self) -> BoxFuture<'_, Option<StorySegment>>;

    fn story_continuation<'a>(
        &'a self,
        current_story: &'a str,
        choice: &'a str,
    ) -> BoxFuture<'a, Option<StorySegment>>;
}

/// Source used when no generative API is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContent;

impl ContentSource for NoContent {
    fn trivia_question<'a>(&'a self, _topic: &'a str) -> BoxFuture<'a, Option<TriviaQuestion>> {
        tracing::warn!("Generative API key missing; no trivia question available");
        Box::pin(async { None })
    }

    fn story_start(&self) -> BoxFuture<'_, Option<StorySegment>> {
        tracing::warn!("Generative API key missing; no story available");
        Box::pin(async { None })
    }

    fn story_continuation<'a>(
        &'a self,
        _current_story: &'a str,
        _choice: &'a str,
    ) -> BoxFuture<'a, Option<StorySegment>> {
        tracing::warn!("Generative API key missing; story cannot continue");
        Box::pin(async { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_content_always_yields_none() {
        let source = NoContent;
        assert!(source.trivia_question(DEFAULT_TRIVIA_TOPIC).await.is_none());
        assert!(source.story_start().await.is_none());
        assert!(source.story_continuation("story", "left").await.is_none());
    }
}
