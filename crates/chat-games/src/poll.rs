//! Free-form poll: viewers answer with the option number.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ChatMessage, GameError, Reward, percent};

pub const DEFAULT_OPTIONS: &str = "Да, Нет";
pub const FIRST_VOTE_POINTS: u32 = 10;

/// Split a comma-separated option list, dropping blanks.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Leading integer of `text`, read the way browsers read `parseInt`:
/// optional whitespace and sign, then digits up to the first non-digit.
pub fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// A vote that was counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVote {
    pub index: usize,
    /// Present only for the viewer's first vote in this poll.
    pub reward: Option<Reward>,
}

#[derive(Debug, Clone, Default)]
pub struct Poll {
    question: String,
    options: Vec<String>,
    active: bool,
    votes: BTreeMap<String, usize>,
}

impl Poll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Open a poll. `options` is a comma-separated list.
    pub fn start(&mut self, question: &str, options: &str) -> Result<(), GameError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(GameError::InvalidPoll);
        }
        let options = parse_options(options);
        if options.len() < 2 {
            return Err(GameError::InvalidPoll);
        }
        tracing::info!(question, options = options.len(), "Poll started");
        self.question = question.to_string();
        self.options = options;
        self.votes.clear();
        self.active = true;
        Ok(())
    }

    /// Close voting. Results stay on screen.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Clear results and go back to the setup form.
    pub fn reset(&mut self) {
        self.votes.clear();
        self.active = false;
    }

    /// Record a vote. Only a viewer's first vote in this poll is rewarded.
    pub fn handle_message(&mut self, msg: &ChatMessage) -> Option<PollVote> {
        if !self.active {
            return None;
        }
        let number = leading_int(msg.message.trim())?;
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        if index >= self.options.len() {
            return None;
        }
        let first_vote = self.votes.insert(msg.username.clone(), index).is_none();
        Some(PollVote {
            index,
            reward: first_vote.then(|| Reward::new(msg.username.clone(), FIRST_VOTE_POINTS)),
        })
    }

    pub fn vote_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.options.len()];
        for &index in self.votes.values() {
            if let Some(slot) = counts.get_mut(index) {
                *slot += 1;
            }
        }
        counts
    }

    pub fn view(&self) -> PollView {
        let counts = self.vote_counts();
        let total = self.votes.len();
        let max = counts.iter().copied().max().unwrap_or(0);
        let options = self
            .options
            .iter()
            .zip(&counts)
            .map(|(label, &count)| PollOptionView {
                label: label.clone(),
                votes: count,
                percent: percent(count, total),
                leading: count > 0 && count == max,
            })
            .collect();
        PollView {
            question: self.question.clone(),
            active: self.active,
            total_votes: total,
            options,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionView {
    pub label: String,
    pub votes: usize,
    pub percent: f64,
    pub leading: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    pub question: String,
    pub active: bool,
    pub total_votes: usize,
    pub options: Vec<PollOptionView>,
}
