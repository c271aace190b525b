//! Trivia: four options, twenty seconds, points for taking part and for
//! the right answer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ChatMessage, Difficulty, GameError, Reward, TriviaQuestion, percent};

pub const ROUND_SECONDS: u32 = 20;
pub const PARTICIPATION_POINTS: u32 = 10;
pub const CORRECT_ANSWER_BONUS: u32 = 50;

// Latin, Cyrillic and keyboard-layout aliases. Matched in order, so a
// token listed twice only ever counts for the first option.
const ANSWER_ALIASES: [&[&str]; 4] = [
    &["1", "a", "а", "ф"],
    &["2", "b", "в", "и"],
    &["3", "c", "с"],
    &["4", "d", "д"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriviaPhase {
    Idle,
    Loading,
    Playing,
    Reveal,
}

/// Map a chat line to an answer index.
pub fn answer_index(text: &str) -> Option<usize> {
    let token = text.trim().to_lowercase();
    ANSWER_ALIASES
        .iter()
        .position(|aliases| aliases.contains(&token.as_str()))
}

#[derive(Debug, Clone)]
pub struct TriviaGame {
    question: Option<TriviaQuestion>,
    phase: TriviaPhase,
    seconds_left: u32,
    round_seconds: u32,
    votes: BTreeMap<String, usize>,
}

impl Default for TriviaGame {
    fn default() -> Self {
        Self::new(ROUND_SECONDS)
    }
}

impl TriviaGame {
    pub fn new(round_seconds: u32) -> Self {
        let round_seconds = round_seconds.max(1);
        Self {
            question: None,
            phase: TriviaPhase::Idle,
            seconds_left: round_seconds,
            round_seconds,
            votes: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> TriviaPhase {
        self.phase
    }

    pub fn question(&self) -> Option<&TriviaQuestion> {
        self.question.as_ref()
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// A new question was requested. Votes from the last round are dropped.
    pub fn begin_loading(&mut self) -> Result<(), GameError> {
        if self.phase == TriviaPhase::Loading {
            return Err(GameError::Busy);
        }
        self.phase = TriviaPhase::Loading;
        self.votes.clear();
        Ok(())
    }

    pub fn start_round(&mut self, question: TriviaQuestion) -> Result<(), GameError> {
        if let Err(e) = question.validate() {
            self.phase = TriviaPhase::Idle;
            return Err(e);
        }
        self.question = Some(question);
        self.votes.clear();
        self.seconds_left = self.round_seconds;
        self.phase = TriviaPhase::Playing;
        Ok(())
    }

    /// The generator returned nothing. The previous question, if any, stays.
    pub fn load_failed(&mut self) {
        self.phase = TriviaPhase::Idle;
    }

    /// Record a vote. Returns true when the message counted as one.
    pub fn handle_message(&mut self, msg: &ChatMessage) -> bool {
        if self.phase != TriviaPhase::Playing {
            return false;
        }
        let Some(index) = answer_index(&msg.message) else {
            return false;
        };
        self.votes.insert(msg.username.clone(), index);
        true
    }

    /// Advance the countdown. Pays out when the round ends.
    pub fn tick(&mut self) -> Vec<Reward> {
        if self.phase != TriviaPhase::Playing {
            return Vec::new();
        }
        if self.seconds_left > 1 {
            self.seconds_left -= 1;
            return Vec::new();
        }
        self.seconds_left = 0;
        self.phase = TriviaPhase::Reveal;
        self.rewards()
    }

    fn rewards(&self) -> Vec<Reward> {
        let Some(question) = &self.question else {
            return Vec::new();
        };
        self.votes
            .iter()
            .map(|(username, &index)| {
                let mut amount = PARTICIPATION_POINTS;
                if index == question.correct_answer_index {
                    amount += CORRECT_ANSWER_BONUS;
                }
                Reward::new(username.clone(), amount)
            })
            .collect()
    }

    pub fn vote_counts(&self) -> [usize; TriviaQuestion::OPTION_COUNT] {
        let mut counts = [0; TriviaQuestion::OPTION_COUNT];
        for &index in self.votes.values() {
            if let Some(slot) = counts.get_mut(index) {
                *slot += 1;
            }
        }
        counts
    }

    pub fn view(&self) -> TriviaView {
        let counts = self.vote_counts();
        let total = self.votes.len();
        TriviaView {
            phase: self.phase,
            question: self.question.as_ref().map(|q| TriviaPrompt {
                question: q.question.clone(),
                options: q.options.clone(),
                difficulty: q.difficulty,
            }),
            seconds_left: self.seconds_left,
            vote_counts: counts.to_vec(),
            vote_percents: counts.iter().map(|&c| percent(c, total)).collect(),
            total_votes: total,
            correct_answer_index: match self.phase {
                TriviaPhase::Reveal => self.question.as_ref().map(|q| q.correct_answer_index),
                _ => None,
            },
        }
    }
}

/// Question as shown on screen; the answer is withheld until reveal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaPrompt {
    pub question: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaView {
    pub phase: TriviaPhase,
    pub question: Option<TriviaPrompt>,
    pub seconds_left: u32,
    pub vote_counts: Vec<usize>,
    pub vote_percents: Vec<f64>,
    pub total_votes: usize,
    pub correct_answer_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> TriviaQuestion {
        TriviaQuestion {
            question: "Столица Франции?".into(),
            options: vec!["Париж".into(), "Лион".into(), "Ницца".into(), "Марсель".into()],
            correct_answer_index: correct,
            difficulty: Difficulty::Easy,
        }
    }

    fn chat(username: &str, message: &str) -> ChatMessage {
        ChatMessage {
            id: format!("{username}-{message}"),
            username: username.into(),
            message: message.into(),
            color: "#FFFFFF".into(),
        }
    }

    fn playing(correct: usize) -> TriviaGame {
        let mut game = TriviaGame::default();
        game.begin_loading().unwrap();
        game.start_round(question(correct)).unwrap();
        game
    }

    #[test]
    fn answer_aliases_cover_latin_cyrillic_and_digits() {
        let cases = [
            ("1", Some(0)),
            (" A ", Some(0)),
            ("а", Some(0)),
            ("Ф", Some(0)),
            ("2", Some(1)),
            ("b", Some(1)),
            ("в", Some(1)),
            ("и", Some(1)),
            ("3", Some(2)),
            ("C", Some(2)),
            ("с", Some(2)),
            ("4", Some(3)),
            ("d", Some(3)),
            ("Д", Some(3)),
            ("5", None),
            ("1 2", None),
            ("answer a", None),
        ];
        for (text, want) in cases {
            assert_eq!(answer_index(text), want, "{text:?}");
        }
    }

    #[test]
    fn votes_are_ignored_outside_playing_phase() {
        let mut game = TriviaGame::default();
        assert!(!game.handle_message(&chat("u", "1")));
        game.begin_loading().unwrap();
        assert!(!game.handle_message(&chat("u", "1")));
        assert_eq!(game.view().total_votes, 0);
    }

    #[test]
    fn latest_vote_per_user_wins() {
        let mut game = playing(0);
        assert!(game.handle_message(&chat("alice", "1")));
        assert!(game.handle_message(&chat("alice", "3")));
        assert!(game.handle_message(&chat("bob", "3")));
        assert!(!game.handle_message(&chat("carol", "hello")));
        assert_eq!(game.vote_counts(), [0, 0, 2, 0]);
        let view = game.view();
        assert_eq!(view.total_votes, 2);
        assert_eq!(view.vote_percents[2], 100.0);
    }

    #[test]
    fn round_ends_after_twenty_ticks_and_pays_out() {
        let mut game = playing(1);
        game.handle_message(&chat("alice", "2"));
        game.handle_message(&chat("bob", "4"));

        for _ in 0..ROUND_SECONDS - 1 {
            assert!(game.tick().is_empty());
        }
        assert_eq!(game.phase(), TriviaPhase::Playing);
        assert_eq!(game.seconds_left(), 1);

        let rewards = game.tick();
        assert_eq!(game.phase(), TriviaPhase::Reveal);
        assert_eq!(game.seconds_left(), 0);
        assert_eq!(
            rewards,
            vec![Reward::new("alice", 60), Reward::new("bob", 10)]
        );
        assert_eq!(game.view().correct_answer_index, Some(1));

        assert!(game.tick().is_empty());
        assert!(!game.handle_message(&chat("late", "2")));
    }

    #[test]
    fn answer_is_hidden_while_playing() {
        let game = playing(3);
        assert_eq!(game.view().correct_answer_index, None);
    }

    #[test]
    fn failed_load_keeps_previous_question() {
        let mut game = playing(0);
        game.begin_loading().unwrap();
        assert_eq!(game.begin_loading(), Err(GameError::Busy));
        game.load_failed();
        assert_eq!(game.phase(), TriviaPhase::Idle);
        assert!(game.question().is_some());
    }

    #[test]
    fn invalid_question_is_rejected() {
        let mut game = TriviaGame::default();
        game.begin_loading().unwrap();
        let mut bad = question(0);
        bad.options.truncate(2);
        assert!(game.start_round(bad).is_err());
        assert_eq!(game.phase(), TriviaPhase::Idle);
    }
}
