//! One-second clock that drives game countdowns.

use std::time::Duration;

use chat_games::session::TickOutcome;

use crate::app::{Overlay, SharedState};
use crate::events;
use crate::services::generation;

const TICK: Duration = Duration::from_secs(1);

pub async fn run(state: SharedState) {
    let token = state.shutdown_token().clone();
    let mut interval = tokio::time::interval(TICK);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("Game clock stopped");
                return;
            }
            _ = interval.tick() => {}
        }
        tick_once(&state).await;
    }
}

/// Advance the session by one second and publish what changed.
pub async fn tick_once(state: &SharedState) {
    let (frames, continuation) = {
        let mut overlay = state.overlay().await;
        let outcome = overlay.session.tick();
        let generation = overlay.session.generation();
        let continuation = outcome.continuation.clone().map(|c| (generation, c));
        (apply_tick(&mut overlay, outcome), continuation)
    };
    state.broadcast_all(frames);

    if let Some((generation, request)) = continuation {
        generation::continue_story(state, generation, request);
    }
}

/// Credit tick rewards and collect the frames to broadcast.
pub fn apply_tick(overlay: &mut Overlay, outcome: TickOutcome) -> Vec<String> {
    let mut frames = Vec::new();
    if outcome.changed {
        frames.push(events::frame(events::GAME, &overlay.session.view()));
    }
    if !outcome.rewards.is_empty() {
        tracing::info!(players = outcome.rewards.len(), "Round closed; rewards paid");
        overlay.leaderboard.apply(&outcome.rewards);
        frames.push(events::frame(events::STATE, &overlay.snapshot()));
    }
    frames
}
