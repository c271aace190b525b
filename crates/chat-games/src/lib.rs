//! Chat-driven mini-games, leaderboard and overlay effects.
//!
//! Every game is a reducer: it looks at the newest [`ChatMessage`] or a
//! one-second tick, updates its own state and hands back the points it
//! wants to award. Nothing here does I/O.

pub mod content;
pub mod effects;
pub mod leaderboard;
pub mod poll;
pub mod session;
pub mod story;
pub mod trivia;
pub mod tug_of_war;

use serde::{Deserialize, Serialize};

pub use content::{ContentSource, NoContent};
pub use leaderboard::{Leaderboard, ViewerStats, badge_for};
pub use session::GameSession;
pub use twitch_chat::ChatMessage;

/// Points granted to one viewer by a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub username: String,
    pub amount: u32,
}

impl Reward {
    pub fn new(username: impl Into<String>, amount: u32) -> Self {
        Self {
            username: username.into(),
            amount,
        }
    }
}

/// Which mini-game is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    #[default]
    None,
    Trivia,
    TugOfWar,
    StoryMode,
    Poll,
}

impl GameType {
    /// Parse the URL slug used by the HTTP API.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "trivia" => Some(Self::Trivia),
            "tug-of-war" | "tug_of_war" => Some(Self::TugOfWar),
            "story" | "story-mode" | "story_mode" => Some(Self::StoryMode),
            "poll" => Some(Self::Poll),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A four-option trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub difficulty: Difficulty,
}

impl TriviaQuestion {
    pub const OPTION_COUNT: usize = 4;

    pub fn validate(&self) -> Result<(), GameError> {
        if self.question.trim().is_empty() {
            return Err(GameError::InvalidQuestion("empty question".into()));
        }
        if self.options.len() != Self::OPTION_COUNT {
            return Err(GameError::InvalidQuestion(format!(
                "expected {} options, got {}",
                Self::OPTION_COUNT,
                self.options.len()
            )));
        }
        if self.correct_answer_index >= Self::OPTION_COUNT {
            return Err(GameError::InvalidQuestion(format!(
                "correct answer index {} out of range",
                self.correct_answer_index
            )));
        }
        Ok(())
    }
}

/// One story step with the two choices offered to chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySegment {
    pub text: String,
    pub option_a: String,
    pub option_b: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid trivia question: {0}")]
    InvalidQuestion(String),
    #[error("poll needs a question and at least two options")]
    InvalidPoll,
    #[error("{action} is not available while {current:?} is selected")]
    WrongGame {
        action: &'static str,
        current: GameType,
    },
    #[error("a generation request is already running")]
    Busy,
}

/// Percentage of `count` in `total`, 0 when nobody voted.
pub(crate) fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_question_uses_camel_case_json() {
        let raw = r#"{
            "question": "Q?",
            "options": ["a", "b", "c", "d"],
            "correctAnswerIndex": 2,
            "difficulty": "Hard"
        }"#;
        let q: TriviaQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(q.correct_answer_index, 2);
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert!(q.validate().is_ok());
    }

    #[test]
    fn trivia_question_validation_rejects_bad_shapes() {
        let mut q = TriviaQuestion {
            question: "Q?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_answer_index: 0,
            difficulty: Difficulty::Easy,
        };
        assert!(q.validate().is_err());
        q.options.push("d".into());
        q.correct_answer_index = 4;
        assert!(q.validate().is_err());
    }

    #[test]
    fn story_segment_uses_option_a_b_keys() {
        let seg: StorySegment =
            serde_json::from_str(r#"{"text":"t","optionA":"left","optionB":"right"}"#).unwrap();
        assert_eq!(seg.option_a, "left");
        assert_eq!(seg.option_b, "right");
    }

    #[test]
    fn game_type_slugs() {
        assert_eq!(GameType::from_slug("Trivia"), Some(GameType::Trivia));
        assert_eq!(GameType::from_slug("tug-of-war"), Some(GameType::TugOfWar));
        assert_eq!(GameType::from_slug("story"), Some(GameType::StoryMode));
        assert_eq!(GameType::from_slug("poll"), Some(GameType::Poll));
        assert_eq!(GameType::from_slug("chess"), None);
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
