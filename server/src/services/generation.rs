//! Background requests for generated trivia questions and story segments.
//!
//! Each request remembers the session generation it started under. A result
//! that arrives after the game was switched is dropped.

use chat_games::GameError;
use chat_games::story::ContinuationRequest;
use tokio::task::JoinHandle;

use crate::app::SharedState;

/// Put trivia into loading and fetch a question.
pub async fn start_trivia(state: &SharedState) -> Result<JoinHandle<()>, GameError> {
    let generation = {
        let mut overlay = state.overlay().await;
        overlay.session.trivia_mut()?.begin_loading()?;
        overlay.session.generation()
    };
    state.broadcast_game().await;

    let topic = state.config().await.trivia_topic.clone();
    let state = state.clone();
    Ok(tokio::spawn(async move {
        let question = state.content().await.trivia_question(&topic).await;

        {
            let mut overlay = state.overlay().await;
            if overlay.session.generation() != generation {
                tracing::debug!(generation, "Dropping trivia question for a closed game");
                return;
            }
            let Ok(trivia) = overlay.session.trivia_mut() else {
                return;
            };
            match question {
                Some(q) => {
                    if let Err(e) = trivia.start_round(q) {
                        tracing::error!("Generated trivia question rejected: {e}");
                    }
                }
                None => trivia.load_failed(),
            }
        }
        state.broadcast_game().await;
    }))
}

/// Put story mode into loading and fetch the opening segment.
pub async fn start_story(state: &SharedState) -> Result<JoinHandle<()>, GameError> {
    let generation = {
        let mut overlay = state.overlay().await;
        overlay.session.story_mut()?.begin_loading()?;
        overlay.session.generation()
    };
    state.broadcast_game().await;

    let state = state.clone();
    Ok(tokio::spawn(async move {
        let segment = state.content().await.story_start().await;

        {
            let mut overlay = state.overlay().await;
            if overlay.session.generation() != generation {
                tracing::debug!(generation, "Dropping story start for a closed game");
                return;
            }
            let Ok(story) = overlay.session.story_mut() else {
                return;
            };
            match segment {
                Some(s) => story.start(s),
                None => story.load_failed(),
            }
        }
        state.broadcast_game().await;
    }))
}

/// Fetch the segment that follows a closed vote. The story is already loading.
pub fn continue_story(
    state: &SharedState,
    generation: u64,
    request: ContinuationRequest,
) -> JoinHandle<()> {
    let state = state.clone();
    tokio::spawn(async move {
        tracing::info!(choice = %request.choice, "Story vote closed; requesting continuation");
        let segment = state
            .content()
            .await
            .story_continuation(&request.story, &request.choice)
            .await;

        {
            let mut overlay = state.overlay().await;
            if overlay.session.generation() != generation {
                tracing::debug!(generation, "Dropping story continuation for a closed game");
                return;
            }
            let Ok(story) = overlay.session.story_mut() else {
                return;
            };
            match segment {
                Some(s) => story.continue_with(s),
                None => story.load_failed(),
            }
        }
        state.broadcast_game().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{empty_state, fixed_state, sample_segment};
    use chat_games::GameType;
    use chat_games::story::Choice;
    use chat_games::trivia::TriviaPhase;

    #[tokio::test]
    async fn trivia_requires_trivia_selected() {
        let state = fixed_state();
        let err = start_trivia(&state).await.unwrap_err();
        assert!(matches!(err, GameError::WrongGame { .. }));
    }

    #[tokio::test]
    async fn trivia_question_starts_round() {
        let state = fixed_state();
        state.overlay().await.session.select(GameType::Trivia);

        start_trivia(&state).await.unwrap().await.unwrap();

        let mut overlay = state.overlay().await;
        let trivia = overlay.session.trivia_mut().unwrap();
        assert_eq!(trivia.phase(), TriviaPhase::Playing);
        assert_eq!(trivia.question().unwrap().options[0], "Paris");
    }

    #[tokio::test]
    async fn missing_content_returns_to_idle() {
        let state = empty_state();
        state.overlay().await.session.select(GameType::Trivia);

        start_trivia(&state).await.unwrap().await.unwrap();

        let mut overlay = state.overlay().await;
        assert_eq!(overlay.session.trivia_mut().unwrap().phase(), TriviaPhase::Idle);
    }

    #[tokio::test]
    async fn second_request_while_loading_is_busy() {
        let state = empty_state();
        state.overlay().await.session.select(GameType::Trivia);
        state
            .overlay()
            .await
            .session
            .trivia_mut()
            .unwrap()
            .begin_loading()
            .unwrap();

        assert_eq!(start_trivia(&state).await.unwrap_err(), GameError::Busy);
    }

    #[tokio::test]
    async fn result_for_a_switched_game_is_dropped() {
        let state = fixed_state();
        state.overlay().await.session.select(GameType::StoryMode);
        let task = start_story(&state).await.unwrap();
        // The single-threaded test runtime has not polled the task yet.
        state.overlay().await.session.select(GameType::StoryMode);
        task.await.unwrap();

        let mut overlay = state.overlay().await;
        let story = overlay.session.story_mut().unwrap();
        assert!(story.history().is_empty());
        assert!(!story.is_loading());
    }

    #[tokio::test]
    async fn story_restart_during_a_vote_is_busy() {
        let state = fixed_state();
        state.overlay().await.session.select(GameType::StoryMode);
        start_story(&state).await.unwrap().await.unwrap();

        assert_eq!(start_story(&state).await.unwrap_err(), GameError::Busy);
        let mut overlay = state.overlay().await;
        let story = overlay.session.story_mut().unwrap();
        assert_eq!(story.history().len(), 1);
        assert!(story.is_voting_open());
    }

    #[tokio::test]
    async fn story_start_and_continuation() {
        let state = fixed_state();
        let generation = state.overlay().await.session.select(GameType::StoryMode);

        start_story(&state).await.unwrap().await.unwrap();
        assert_eq!(
            state.overlay().await.session.story_mut().unwrap().history(),
            &[sample_segment()]
        );

        let request = {
            let mut overlay = state.overlay().await;
            let story = overlay.session.story_mut().unwrap();
            let outcome = loop {
                if let Some(outcome) = story.tick() {
                    break outcome;
                }
            };
            outcome.continuation.unwrap()
        };
        assert_eq!(
            request,
            ContinuationRequest {
                story: "A door creaks open.".into(),
                choice: "Enter".into(),
                winner: Choice::A,
            }
        );
        continue_story(&state, generation, request).await.unwrap();

        let mut overlay = state.overlay().await;
        let story = overlay.session.story_mut().unwrap();
        assert_eq!(story.history().len(), 2);
        assert!(story.is_voting_open());
    }
}
