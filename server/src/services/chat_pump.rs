//! Chat connection lifecycle and the task that feeds chat into the overlay.

use tokio::sync::mpsc;
use twitch_chat::chat::ChatConfig;
use twitch_chat::{ChatClient, ChatError, ChatEvent, ChatMessage};

use crate::app::{Overlay, SharedState};
use crate::events;

/// Join a channel, replacing any current connection. Returns the normalized channel.
pub async fn connect(state: &SharedState, raw_channel: &str) -> Result<String, ChatError> {
    connect_with(state, ChatConfig::new(raw_channel)?).await
}

pub async fn connect_with(state: &SharedState, config: ChatConfig) -> Result<String, ChatError> {
    let channel = config.channel.clone();
    let (events_rx, handle) = ChatClient::connect_with(config);
    let (id, previous) = state.replace_chat(handle).await;
    if let Some(old) = previous.filter(|h| !h.is_closed()) {
        tracing::info!(channel = old.channel(), "Closing previous chat connection");
        old.close().await;
    }

    {
        let mut overlay = state.overlay().await;
        overlay.channel = Some(channel.clone());
        overlay.connected = false;
    }
    state.broadcast_state().await;

    tracing::info!(channel = %channel, "Joining chat");
    let pump_state = state.clone();
    tokio::spawn(async move { run(pump_state, id, events_rx).await });
    Ok(channel)
}

/// Close the connection and forget the channel.
pub async fn disconnect(state: &SharedState) -> Option<String> {
    let handle = state.take_chat().await;
    let channel = handle.as_ref().map(|h| h.channel().to_string());
    if let Some(handle) = handle {
        handle.close().await;
        tracing::info!(channel = ?channel, "Chat disconnected");
    }

    {
        let mut overlay = state.overlay().await;
        overlay.channel = None;
        overlay.connected = false;
    }
    state.broadcast_state().await;
    channel
}

/// Consume events of connection `id` until it ends or the app shuts down.
async fn run(state: SharedState, id: u64, mut events_rx: mpsc::Receiver<ChatEvent>) {
    let token = state.shutdown_token().clone();
    loop {
        let event = tokio::select! {
            _ = token.cancelled() => break,
            event = events_rx.recv() => event,
        };
        let Some(event) = event else {
            break;
        };

        // A replaced connection may still flush events; only the stored one counts.
        if !state.is_current_chat(id).await {
            tracing::debug!(id, "Dropping event from a replaced chat connection");
            continue;
        }

        match event {
            ChatEvent::Connected { channel } => {
                tracing::info!(channel = %channel, "Chat connected");
                state.overlay().await.connected = true;
                state.broadcast_state().await;
            }
            ChatEvent::Message(msg) => {
                let frames = apply_message(&mut *state.overlay().await, msg);
                state.broadcast_all(frames);
            }
            ChatEvent::Disconnected { reason } => {
                match &reason {
                    Some(r) => tracing::warn!("Chat disconnected: {r}"),
                    None => tracing::info!("Chat disconnected"),
                }
                state.overlay().await.connected = false;
                state.broadcast_state().await;
                break;
            }
        }
    }
}

/// Push a message through the buffer, the active game, the leaderboard and the
/// smile effect. Returns the frames to broadcast.
pub fn apply_message(overlay: &mut Overlay, msg: ChatMessage) -> Vec<String> {
    let mut frames = vec![events::frame(events::CHAT_MESSAGE, &msg)];

    let (rewards, changed) = overlay.session.handle_message(&msg);
    if let Some(particle) = overlay.smiles.observe(&msg) {
        frames.push(events::frame(events::EFFECT, &particle));
    }
    overlay.buffer.push(msg);

    if changed {
        frames.push(events::frame(events::GAME, &overlay.session.view()));
    }
    if !rewards.is_empty() {
        overlay.leaderboard.apply(&rewards);
        frames.push(events::frame(events::STATE, &overlay.snapshot()));
    }
    frames
}
