//! The game currently on screen and the routing of chat and clock input.

use serde::Serialize;

use crate::poll::{Poll, PollView};
use crate::story::{ContinuationRequest, StoryMode, StoryView};
use crate::trivia::{self, TriviaGame, TriviaPhase, TriviaView};
use crate::tug_of_war::{TugOfWar, TugOfWarView};
use crate::{ChatMessage, GameError, GameType, Reward, story};

/// Countdown lengths for the timed games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimers {
    pub trivia_seconds: u32,
    pub story_vote_seconds: u32,
}

impl Default for SessionTimers {
    fn default() -> Self {
        Self {
            trivia_seconds: trivia::ROUND_SECONDS,
            story_vote_seconds: story::VOTE_SECONDS,
        }
    }
}

#[derive(Debug, Clone)]
enum ActiveGame {
    None,
    Trivia(TriviaGame),
    TugOfWar(TugOfWar),
    Story(StoryMode),
    Poll(Poll),
}

/// What one clock tick produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub rewards: Vec<Reward>,
    /// Set when a story vote closed and the next segment is needed.
    pub continuation: Option<ContinuationRequest>,
    /// True when a countdown moved and the overlay should redraw.
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    active: ActiveGame,
    timers: SessionTimers,
    generation: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionTimers::default())
    }
}

impl GameSession {
    pub fn new(timers: SessionTimers) -> Self {
        Self {
            active: ActiveGame::None,
            timers,
            generation: 0,
        }
    }

    pub fn current(&self) -> GameType {
        match self.active {
            ActiveGame::None => GameType::None,
            ActiveGame::Trivia(_) => GameType::Trivia,
            ActiveGame::TugOfWar(_) => GameType::TugOfWar,
            ActiveGame::Story(_) => GameType::StoryMode,
            ActiveGame::Poll(_) => GameType::Poll,
        }
    }

    /// Bumped on every game switch. Async results carrying an older value
    /// belong to a game that is gone and must be dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch to a game with fresh state.
    pub fn select(&mut self, game: GameType) -> u64 {
        self.active = match game {
            GameType::None => ActiveGame::None,
            GameType::Trivia => ActiveGame::Trivia(TriviaGame::new(self.timers.trivia_seconds)),
            GameType::TugOfWar => ActiveGame::TugOfWar(TugOfWar::new()),
            GameType::StoryMode => {
                ActiveGame::Story(StoryMode::new(self.timers.story_vote_seconds))
            }
            GameType::Poll => ActiveGame::Poll(Poll::new()),
        };
        self.generation += 1;
        tracing::info!(game = ?game, generation = self.generation, "Game selected");
        self.generation
    }

    /// New countdown lengths, used by games selected from now on.
    pub fn set_timers(&mut self, timers: SessionTimers) {
        self.timers = timers;
    }

    pub fn exit(&mut self) {
        self.select(GameType::None);
    }

    pub fn trivia_mut(&mut self) -> Result<&mut TriviaGame, GameError> {
        let current = self.current();
        match &mut self.active {
            ActiveGame::Trivia(game) => Ok(game),
            _ => Err(GameError::WrongGame {
                action: "trivia",
                current,
            }),
        }
    }

    pub fn tug_of_war_mut(&mut self) -> Result<&mut TugOfWar, GameError> {
        let current = self.current();
        match &mut self.active {
            ActiveGame::TugOfWar(game) => Ok(game),
            _ => Err(GameError::WrongGame {
                action: "tug of war",
                current,
            }),
        }
    }

    pub fn story_mut(&mut self) -> Result<&mut StoryMode, GameError> {
        let current = self.current();
        match &mut self.active {
            ActiveGame::Story(game) => Ok(game),
            _ => Err(GameError::WrongGame {
                action: "story",
                current,
            }),
        }
    }

    pub fn poll_mut(&mut self) -> Result<&mut Poll, GameError> {
        let current = self.current();
        match &mut self.active {
            ActiveGame::Poll(game) => Ok(game),
            _ => Err(GameError::WrongGame {
                action: "poll",
                current,
            }),
        }
    }

    /// Feed the newest chat message to the active game.
    ///
    /// Returns the rewards it earned and whether the game state changed.
    pub fn handle_message(&mut self, msg: &ChatMessage) -> (Vec<Reward>, bool) {
        match &mut self.active {
            ActiveGame::None => (Vec::new(), false),
            ActiveGame::Trivia(game) => (Vec::new(), game.handle_message(msg)),
            ActiveGame::TugOfWar(game) => (Vec::new(), game.handle_message(msg).is_some()),
            ActiveGame::Story(game) => (Vec::new(), game.handle_message(msg).is_some()),
            ActiveGame::Poll(game) => match game.handle_message(msg) {
                Some(vote) => (vote.reward.into_iter().collect(), true),
                None => (Vec::new(), false),
            },
        }
    }

    /// Advance countdowns by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match &mut self.active {
            ActiveGame::Trivia(game) => {
                let running = game.phase() == TriviaPhase::Playing;
                TickOutcome {
                    rewards: game.tick(),
                    continuation: None,
                    changed: running,
                }
            }
            ActiveGame::Story(game) => {
                let running = game.is_voting_open();
                match game.tick() {
                    Some(outcome) => TickOutcome {
                        rewards: outcome.rewards,
                        continuation: outcome.continuation,
                        changed: true,
                    },
                    None => TickOutcome {
                        changed: running,
                        ..TickOutcome::default()
                    },
                }
            }
            _ => TickOutcome::default(),
        }
    }

    pub fn view(&self) -> GameView {
        match &self.active {
            ActiveGame::None => GameView::None,
            ActiveGame::Trivia(game) => GameView::Trivia(game.view()),
            ActiveGame::TugOfWar(game) => GameView::TugOfWar(game.view()),
            ActiveGame::Story(game) => GameView::StoryMode(game.view()),
            ActiveGame::Poll(game) => GameView::Poll(game.view()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "game", content = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameView {
    None,
    Trivia(TriviaView),
    TugOfWar(TugOfWarView),
    StoryMode(StoryView),
    Poll(PollView),
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
