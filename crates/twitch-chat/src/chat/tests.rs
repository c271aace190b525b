use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as Msg;

use super::*;

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(rx: &mut mpsc::Receiver<ChatEvent>) -> ChatEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("event timeout")
        .expect("event channel closed")
}

#[test]
fn login_lines_follow_anonymous_handshake() {
    let config = ChatConfig::new("#Ninja").unwrap();
    let lines = config.login_lines("justinfan123");
    assert_eq!(
        lines,
        [
            "CAP REQ :twitch.tv/tags twitch.tv/commands".to_string(),
            "PASS SCHMOOPIIE".to_string(),
            "NICK justinfan123".to_string(),
            "JOIN #ninja".to_string(),
        ]
    );
    assert_eq!(config.display_name, "#Ninja");
    assert_eq!(config.ws_url, TWITCH_IRC_WS_ENDPOINT);
}

#[test]
fn anonymous_nick_is_a_justinfan_guest() {
    let nick = anonymous_nick();
    let suffix = nick.strip_prefix("justinfan").expect("prefix");
    let n: u32 = suffix.parse().expect("numeric suffix");
    assert!(n < 100_000);
}

#[test]
fn connect_rejects_invalid_channel() {
    assert!(matches!(
        ChatClient::connect("not a channel"),
        Err(ChatError::InvalidChannel(_))
    ));
}

#[tokio::test]
async fn session_parses_frames_answers_ping_and_reports_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let mut login = Vec::new();
        while login.len() < 4 {
            if let Some(Ok(Msg::Text(text))) = ws.next().await {
                login.push(text.as_str().to_string());
            }
        }

        let frame = "PING :tmi.twitch.tv\r\n\
                     @color=#00AAFF; :viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #chan :hello\r\n";
        ws.send(Msg::Text(frame.into())).await.unwrap();

        let pong = loop {
            if let Some(Ok(Msg::Text(text))) = ws.next().await {
                break text.as_str().to_string();
            }
        };
        ws.close(None).await.unwrap();
        (login, pong)
    });

    let config = ChatConfig::new("Chan")
        .unwrap()
        .with_url(format!("ws://{addr}"));
    let (mut rx, _handle) = ChatClient::connect_with(config);

    assert_eq!(
        next_event(&mut rx).await,
        ChatEvent::Connected {
            channel: "chan".to_string()
        }
    );
    match next_event(&mut rx).await {
        ChatEvent::Message(notice) => {
            assert_eq!(notice.id, crate::SYSTEM_CONNECTED_ID);
            assert!(notice.message.ends_with("Chan"));
        }
        other => panic!("expected notice, got {other:?}"),
    }
    match next_event(&mut rx).await {
        ChatEvent::Message(msg) => {
            assert_eq!(msg.username, "viewer");
            assert_eq!(msg.message, "hello");
            assert_eq!(msg.color, "#00AAFF");
        }
        other => panic!("expected chat message, got {other:?}"),
    }
    assert!(matches!(
        next_event(&mut rx).await,
        ChatEvent::Disconnected { .. }
    ));

    let (login, pong) = server.await.unwrap();
    assert_eq!(login[0], "CAP REQ :twitch.tv/tags twitch.tv/commands");
    assert_eq!(login[3], "JOIN #chan");
    assert_eq!(pong, crate::irc::PONG_REPLY);
}

#[tokio::test]
async fn unreachable_gateway_reports_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ChatConfig::new("chan")
        .unwrap()
        .with_url(format!("ws://{addr}"));
    let (mut rx, _handle) = ChatClient::connect_with(config);
    match next_event(&mut rx).await {
        ChatEvent::Disconnected { reason } => assert!(reason.is_some()),
        other => panic!("expected disconnect, got {other:?}"),
    }
}

/// Accepts one client, reads its login lines and reports whether the client
/// sent a Close frame before the socket ended.
async fn spawn_close_watcher() -> (String, tokio::task::JoinHandle<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        loop {
            match ws.next().await {
                Some(Ok(Msg::Close(_))) => break true,
                Some(Ok(_)) => {}
                _ => break false,
            }
        }
    });
    (format!("ws://{addr}"), server)
}

async fn wait_until_joined(rx: &mut mpsc::Receiver<ChatEvent>) {
    assert!(matches!(next_event(rx).await, ChatEvent::Connected { .. }));
    assert!(matches!(next_event(rx).await, ChatEvent::Message(_)));
}

async fn assert_single_clean_disconnect(rx: &mut mpsc::Receiver<ChatEvent>) {
    assert_eq!(
        next_event(rx).await,
        ChatEvent::Disconnected { reason: None }
    );
    let after = tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("event channel should close");
    assert_eq!(after, None);
}

#[tokio::test]
async fn close_sends_close_frame_and_one_clean_disconnect() {
    let (url, server) = spawn_close_watcher().await;
    let config = ChatConfig::new("chan").unwrap().with_url(url);
    let (mut rx, handle) = ChatClient::connect_with(config);
    wait_until_joined(&mut rx).await;

    handle.close().await;

    assert_single_clean_disconnect(&mut rx).await;
    assert!(tokio::time::timeout(WAIT, server).await.unwrap().unwrap());
}

#[tokio::test]
async fn dropping_handle_closes_the_socket() {
    let (url, server) = spawn_close_watcher().await;
    let config = ChatConfig::new("chan").unwrap().with_url(url);
    let (mut rx, handle) = ChatClient::connect_with(config);
    wait_until_joined(&mut rx).await;
    assert!(!handle.is_closed());

    drop(handle);

    assert_single_clean_disconnect(&mut rx).await;
    assert!(tokio::time::timeout(WAIT, server).await.unwrap().unwrap());
}
