//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const DEFS: &[DefTuple] = &[
    ("SERVER_PORT", "8080", false, false, "HTTP/WebSocket server port"),
    (
        "GEMINI_API_KEY",
        "",
        true,
        true,
        "Gemini API key used for trivia questions and story segments",
    ),
    ("GEMINI_MODEL", gemini_client::DEFAULT_MODEL, false, false, "Gemini model name"),
    (
        "GEMINI_BASE_URL",
        gemini_client::DEFAULT_BASE_URL,
        false,
        false,
        "Gemini REST endpoint root",
    ),
    (
        "TRIVIA_TOPIC",
        chat_games::content::DEFAULT_TRIVIA_TOPIC,
        false,
        false,
        "Topic passed to the trivia question prompt",
    ),
    (
        "DEFAULT_CHANNEL",
        "",
        false,
        false,
        "Channel joined automatically at startup (empty = none)",
    ),
    ("TRIVIA_SECONDS", "20", false, false, "Trivia answer window in seconds"),
    ("STORY_VOTE_SECONDS", "25", false, false, "Story vote window in seconds"),
];

/// Keys read as a fallback when the primary key is unset.
pub const KEY_ALIASES: &[(&str, &str)] = &[("GEMINI_API_KEY", "API_KEY")];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});
