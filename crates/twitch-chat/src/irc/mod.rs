//! Twitch IRC line parser.
//!
//! Only two commands matter here: `PING` (answered with `PONG`) and
//! `PRIVMSG` (turned into a [`ChatMessage`]). Everything else is ignored.


use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::ChatMessage;

/// Reply sent for every `PING` line.
pub const PONG_REPLY: &str = "PONG :tmi.twitch.tv";

/// Fallback name colors for users without a `color` tag.
pub const FALLBACK_COLORS: [&str; 6] = [
    "#FF5733", "#33FF57", "#3357FF", "#F333FF", "#33FFF5", "#FF3333",
];

const PRIVMSG: &str = "PRIVMSG";
const UNKNOWN_USER: &str = "Unknown";

// `\w` is ASCII-only here; Twitch logins never carry anything else.
static RE_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_]+)![^ ]+").unwrap());
static RE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+\s+:(.*)").unwrap());
static RE_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"color=(#[0-9A-Fa-f]{6});").unwrap());

/// Result of parsing one raw IRC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrcLine {
    Ping,
    Privmsg(ChatMessage),
    Ignored,
}

/// Split a WebSocket text frame into its non-empty IRC lines.
pub fn split_lines(frame: &str) -> impl Iterator<Item = &str> {
    frame.split("\r\n").filter(|line| !line.is_empty())
}

/// Parse a single line, drawing fallback colors from the thread RNG.
pub fn parse_line(line: &str) -> IrcLine {
    parse_line_with_rng(line, &mut rand::thread_rng())
}

pub fn parse_line_with_rng<R: Rng + ?Sized>(line: &str, rng: &mut R) -> IrcLine {
    if line.is_empty() {
        return IrcLine::Ignored;
    }
    if line.starts_with("PING") {
        return IrcLine::Ping;
    }

    let Some((meta, rest)) = line.split_once(PRIVMSG) else {
        return IrcLine::Ignored;
    };
    if rest.is_empty() {
        tracing::trace!(line, "Dropping PRIVMSG line without body");
        return IrcLine::Ignored;
    }

    let username = RE_USER
        .captures(meta)
        .and_then(|c| c.get(1))
        .map_or(UNKNOWN_USER, |m| m.as_str())
        .to_string();
    let message = RE_TEXT
        .captures(rest)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str())
        .to_string();
    let color = RE_COLOR
        .captures(meta)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| random_color(rng).to_string());

    IrcLine::Privmsg(ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        message,
        color,
    })
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_COLORS[rng.gen_range(0..FALLBACK_COLORS.len())]
}
