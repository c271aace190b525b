use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as Msg;

use super::*;
use crate::irc::{self, IrcLine, PONG_REPLY};

impl ChatClient {
    /// Run one connection until the server closes it or shutdown is asked.
    ///
    /// Returns `Ok(())` for a requested shutdown and an error otherwise.
    pub(super) async fn connect_once(
        config: &ChatConfig,
        event_tx: &mpsc::Sender<ChatEvent>,
        shutdown_rx: &mut mpsc::Receiver<()>,
    ) -> Result<(), ChatError> {
        tracing::info!(ws_url = %config.ws_url, channel = %config.channel, "Connecting to Twitch chat");
        let (mut ws, _) = connect_async(config.ws_url.as_str()).await?;

        let nick = anonymous_nick();
        for line in config.login_lines(&nick) {
            ws.send(Msg::Text(line.into())).await?;
        }
        tracing::info!(channel = %config.channel, nick = %nick, "Joined Twitch chat anonymously");

        let _ = event_tx
            .send(ChatEvent::Connected {
                channel: config.channel.clone(),
            })
            .await;
        let _ = event_tx
            .send(ChatEvent::Message(ChatMessage::connected_notice(
                &config.display_name,
            )))
            .await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!(channel = %config.channel, "Chat shutdown requested");
                    let _ = ws.close(None).await;
                    return Ok(());
                }
                frame = ws.next() => {
                    match frame {
                        Some(Ok(Msg::Text(text))) => {
                            for line in irc::split_lines(text.as_str()) {
                                match irc::parse_line(line) {
                                    IrcLine::Ping => {
                                        tracing::trace!("IRC PING received");
                                        ws.send(Msg::Text(PONG_REPLY.into())).await?;
                                    }
                                    IrcLine::Privmsg(msg) => {
                                        tracing::debug!(username = %msg.username, "Chat message");
                                        if event_tx.send(ChatEvent::Message(msg)).await.is_err() {
                                            tracing::info!("Chat event receiver dropped");
                                            let _ = ws.close(None).await;
                                            return Ok(());
                                        }
                                    }
                                    IrcLine::Ignored => {}
                                }
                            }
                        }
                        Some(Ok(Msg::Ping(data))) => {
                            let _ = ws.send(Msg::Pong(data)).await;
                        }
                        Some(Ok(Msg::Close(_))) | None => {
                            tracing::warn!(channel = %config.channel, "Chat WebSocket closed by server");
                            return Err(ChatError::Closed);
                        }
                        Some(Err(e)) => return Err(ChatError::WebSocket(e)),
                        Some(Ok(_)) => {}
                    }
                }
            }
        }
    }
}
