//! Branching story: chat votes A or B, the winning branch is continued by
//! the generator, and voting reopens.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ChatMessage, GameError, Reward, StorySegment};

pub const VOTE_SECONDS: u32 = 25;
pub const VOTE_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Choice {
    A,
    B,
}

/// Map a chat line to a story choice.
pub fn choice_for(text: &str) -> Option<Choice> {
    let text = text.trim().to_lowercase();
    if text == "a" || text == "а" || text.contains("option a") {
        Some(Choice::A)
    } else if text == "b" || text == "б" || text.contains("option b") {
        Some(Choice::B)
    } else {
        None
    }
}

/// What the caller should ask the generator for once a vote closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationRequest {
    pub story: String,
    pub choice: String,
    pub winner: Choice,
}

/// Result of a finished vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub rewards: Vec<Reward>,
    pub continuation: Option<ContinuationRequest>,
}

#[derive(Debug, Clone)]
pub struct StoryMode {
    history: Vec<StorySegment>,
    loading: bool,
    voting_open: bool,
    seconds_left: u32,
    vote_seconds: u32,
    votes: BTreeMap<String, Choice>,
}

impl Default for StoryMode {
    fn default() -> Self {
        Self::new(VOTE_SECONDS)
    }
}

impl StoryMode {
    pub fn new(vote_seconds: u32) -> Self {
        Self {
            history: Vec::new(),
            loading: false,
            voting_open: false,
            seconds_left: 0,
            vote_seconds: vote_seconds.max(1),
            votes: BTreeMap::new(),
        }
    }

    pub fn history(&self) -> &[StorySegment] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_voting_open(&self) -> bool {
        self.voting_open
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Claim the generator for an opening segment.
    ///
    /// Refused while a vote is open, since closing it requests a continuation
    /// of the current story.
    pub fn begin_loading(&mut self) -> Result<(), GameError> {
        if self.loading || self.voting_open {
            return Err(GameError::Busy);
        }
        self.loading = true;
        Ok(())
    }

    /// Replace the history with an opening segment and open voting.
    pub fn start(&mut self, segment: StorySegment) {
        self.loading = false;
        self.history = vec![segment];
        self.open_voting();
    }

    /// Append the next segment and open voting again.
    pub fn continue_with(&mut self, segment: StorySegment) {
        self.loading = false;
        self.history.push(segment);
        self.open_voting();
    }

    /// The generator returned nothing. Voting stays closed.
    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    fn open_voting(&mut self) {
        self.votes.clear();
        self.seconds_left = self.vote_seconds;
        self.voting_open = true;
    }

    pub fn handle_message(&mut self, msg: &ChatMessage) -> Option<Choice> {
        if !self.voting_open {
            return None;
        }
        let choice = choice_for(&msg.message)?;
        self.votes.insert(msg.username.clone(), choice);
        Some(choice)
    }

    pub fn tally(&self) -> (usize, usize) {
        self.votes
            .values()
            .fold((0, 0), |(a, b), choice| match choice {
                Choice::A => (a + 1, b),
                Choice::B => (a, b + 1),
            })
    }

    /// Advance the vote timer. Returns the outcome when the vote closes.
    pub fn tick(&mut self) -> Option<VoteOutcome> {
        if !self.voting_open {
            return None;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            return None;
        }
        Some(self.finish_voting())
    }

    fn finish_voting(&mut self) -> VoteOutcome {
        self.voting_open = false;
        let rewards = self
            .votes
            .keys()
            .map(|username| Reward::new(username.clone(), VOTE_POINTS))
            .collect();

        let (a, b) = self.tally();
        // Ties go to A.
        let winner = if a >= b { Choice::A } else { Choice::B };
        let continuation = self.history.last().map(|last| {
            let choice = match winner {
                Choice::A => last.option_a.clone(),
                Choice::B => last.option_b.clone(),
            };
            ContinuationRequest {
                story: last.text.clone(),
                choice,
                winner,
            }
        });
        if continuation.is_some() {
            self.loading = true;
        }
        tracing::debug!(votes_a = a, votes_b = b, winner = ?winner, "Story vote closed");
        VoteOutcome {
            rewards,
            continuation,
        }
    }

    pub fn view(&self) -> StoryView {
        let (votes_a, votes_b) = self.tally();
        StoryView {
            history: self.history.clone(),
            loading: self.loading,
            voting_open: self.voting_open,
            seconds_left: self.seconds_left,
            votes_a,
            votes_b,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    pub history: Vec<StorySegment>,
    pub loading: bool,
    pub voting_open: bool,
    pub seconds_left: u32,
    pub votes_a: usize,
    pub votes_b: usize,
}
