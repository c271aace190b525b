use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};

use crate::app::SharedState;
use crate::events::{self, ConnectedPayload};

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe_ws();

    // Send connection confirmation and the current overlay state
    let client_id = uuid::Uuid::new_v4().to_string();
    let welcome = events::frame(
        events::CONNECTED,
        &ConnectedPayload {
            client_id: client_id.clone(),
        },
    );
    let snapshot = events::frame(events::STATE, &state.overlay().await.snapshot());
    for frame in [welcome, snapshot] {
        if sender.send(Message::Text(frame.into())).await.is_err() {
            return;
        }
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    // Replies meant for this client only
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(16);

    // Forward broadcast frames and replies to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(frame) => frame,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "WebSocket client lagging; frames dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(frame) => frame,
                    None => break,
                },
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Receive messages from this client
    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_message(&text) {
                        if reply_tx.send(reply).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Answer a client frame. The overlay only sends keep-alive pings.
fn handle_client_message(text: &str) -> Option<String> {
    let msg = serde_json::from_str::<serde_json::Value>(text).ok()?;
    match msg.get("type").and_then(|t| t.as_str()) {
        Some("ping") => Some(serde_json::json!({ "type": events::PONG }).to_string()),
        _ => {
            tracing::debug!("Ignoring WebSocket client frame: {text}");
            None
        }
    }
}
