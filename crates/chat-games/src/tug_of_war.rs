//! Tug of war: `!red` and `!blue` pull a shared bar until one side wins.

use serde::Serialize;

use crate::ChatMessage;

pub const START_BALANCE: f64 = 50.0;
pub const PULL_POWER: f64 = 1.5;
const RED_COMMANDS: [&str; 2] = ["!red", "!красные"];
const BLUE_COMMANDS: [&str; 2] = ["!blue", "!синие"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Red,
    Blue,
}

/// Balance runs from 0 (blue wins) to 100 (red wins).
#[derive(Debug, Clone)]
pub struct TugOfWar {
    balance: f64,
    winner: Option<Team>,
    active: bool,
}

impl Default for TugOfWar {
    fn default() -> Self {
        Self {
            balance: START_BALANCE,
            winner: None,
            active: false,
        }
    }
}

impl TugOfWar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start (or restart) a match from the middle.
    pub fn reset(&mut self) {
        self.balance = START_BALANCE;
        self.winner = None;
        self.active = true;
    }

    /// Apply one pull. Returns the team that pulled, if any.
    pub fn handle_message(&mut self, msg: &ChatMessage) -> Option<Team> {
        if !self.active || self.winner.is_some() {
            return None;
        }
        let text = msg.message.trim().to_lowercase();
        let team = if RED_COMMANDS.iter().any(|c| text.contains(c)) {
            self.balance = (self.balance + PULL_POWER).min(100.0);
            Team::Red
        } else if BLUE_COMMANDS.iter().any(|c| text.contains(c)) {
            self.balance = (self.balance - PULL_POWER).max(0.0);
            Team::Blue
        } else {
            return None;
        };

        if self.balance >= 100.0 {
            self.finish(Team::Red);
        } else if self.balance <= 0.0 {
            self.finish(Team::Blue);
        }
        Some(team)
    }

    fn finish(&mut self, team: Team) {
        tracing::info!(winner = ?team, "Tug of war finished");
        self.winner = Some(team);
        self.active = false;
    }

    pub fn view(&self) -> TugOfWarView {
        TugOfWarView {
            balance: self.balance,
            winner: self.winner,
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TugOfWarView {
    pub balance: f64,
    pub winner: Option<Team>,
    pub active: bool,
}
