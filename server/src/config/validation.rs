//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_CHANNEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?[A-Za-z0-9_]{1,25}$").unwrap());
static RE_MODEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "TRIVIA_SECONDS" => validate_int_range(value, 5, 300)?,
        "STORY_VOTE_SECONDS" => validate_int_range(value, 5, 300)?,
        "DEFAULT_CHANNEL" => {
            if !value.is_empty() && !RE_CHANNEL.is_match(value.trim()) {
                return Err("channel may contain only letters, digits and '_'".into());
            }
        }
        "GEMINI_MODEL" => {
            if !RE_MODEL.is_match(value) {
                return Err("invalid model name".into());
            }
        }
        "GEMINI_BASE_URL" => {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err("must start with http:// or https://".into());
            }
        }
        "TRIVIA_TOPIC" => {
            if value.trim().is_empty() || value.chars().count() > 200 {
                return Err("topic must be 1-200 characters".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
