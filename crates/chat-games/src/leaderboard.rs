//! Session leaderboard: additive scores keyed by username.

use std::collections::HashMap;

use serde::Serialize;

use crate::Reward;

pub const TOP_LIMIT: usize = 10;

/// Badge earned at a given score, or an empty string.
pub fn badge_for(score: u64) -> &'static str {
    match score {
        s if s >= 1000 => "💎",
        s if s >= 500 => "🥇",
        s if s >= 100 => "🥈",
        s if s >= 10 => "🥉",
        _ => "",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerStats {
    pub username: String,
    pub score: u64,
    pub badges: Vec<String>,
}

impl ViewerStats {
    fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            score: 0,
            badges: Vec::new(),
        }
    }

    fn add(&mut self, amount: u32) {
        self.score += u64::from(amount);
        let badge = badge_for(self.score);
        self.badges = if badge.is_empty() {
            Vec::new()
        } else {
            vec![badge.to_string()]
        };
    }
}

/// Entries are never removed; the board lives as long as the session.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<ViewerStats>,
    index: HashMap<String, usize>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to a viewer, creating the entry on first reward.
    pub fn reward(&mut self, username: &str, amount: u32) -> &ViewerStats {
        let idx = match self.index.get(username) {
            Some(&idx) => idx,
            None => {
                self.entries.push(ViewerStats::new(username));
                let idx = self.entries.len() - 1;
                self.index.insert(username.to_string(), idx);
                idx
            }
        };
        let entry = &mut self.entries[idx];
        entry.add(amount);
        tracing::debug!(username, amount, score = entry.score, "Reward applied");
        entry
    }

    pub fn apply(&mut self, rewards: &[Reward]) {
        for reward in rewards {
            self.reward(&reward.username, reward.amount);
        }
    }

    pub fn get(&self, username: &str) -> Option<&ViewerStats> {
        self.index.get(username).map(|&idx| &self.entries[idx])
    }

    pub fn score(&self, username: &str) -> u64 {
        self.get(username).map_or(0, |s| s.score)
    }

    /// Highest scores first; ties keep the order viewers first scored.
    pub fn top(&self, limit: usize) -> Vec<ViewerStats> {
        let mut sorted: Vec<&ViewerStats> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.into_iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
