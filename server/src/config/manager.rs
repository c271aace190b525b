//! SettingsManager: environment-backed settings with defaults, validation, and feature status.

use std::collections::HashMap;

use super::defaults::{DEFAULT_SETTINGS, KEY_ALIASES};
use super::validation::validate_setting;
use super::{FeatureStatus, SettingInfo, SettingType};

const MASK: &str = "********";

/// A snapshot of raw setting values (usually the process environment).
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    values: HashMap<String, String>,
}

impl SettingsManager {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Capture every known key (and its alias) from the environment.
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        let keys = DEFAULT_SETTINGS
            .keys()
            .copied()
            .chain(KEY_ALIASES.iter().map(|(_, alias)| *alias));
        for key in keys {
            if let Ok(v) = std::env::var(key) {
                values.insert(key.to_string(), v);
            }
        }
        Self { values }
    }

    /// Raw value as provided, following key aliases. Empty values count as unset.
    fn raw(&self, key: &str) -> Option<&str> {
        if let Some(v) = self.values.get(key).filter(|v| !v.trim().is_empty()) {
            return Some(v.as_str());
        }
        KEY_ALIASES
            .iter()
            .filter(|(primary, _)| *primary == key)
            .find_map(|(_, alias)| self.values.get(*alias).filter(|v| !v.trim().is_empty()))
            .map(String::as_str)
    }

    /// Get a setting value. Invalid or missing values fall back to the default.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("setting not found: {key}"))?;

        match self.raw(key) {
            Some(value) => match validate_setting(key, value) {
                Ok(()) => Ok(value.to_string()),
                Err(e) => {
                    tracing::warn!("Invalid value for {key} ({e}); using default");
                    Ok(def.default.to_string())
                }
            },
            None => Ok(def.default.to_string()),
        }
    }

    /// Get all settings with secrets masked.
    pub fn get_all_settings(&self) -> HashMap<String, SettingInfo> {
        DEFAULT_SETTINGS
            .values()
            .map(|def| {
                let value = self
                    .get_setting(def.key)
                    .unwrap_or_else(|_| def.default.to_string());
                let has_value = !value.is_empty();
                let setting_type = if def.secret {
                    SettingType::Secret
                } else {
                    SettingType::Normal
                };
                let shown = if def.secret && has_value {
                    MASK.to_string()
                } else {
                    value
                };
                (
                    def.key.to_string(),
                    SettingInfo {
                        key: def.key.to_string(),
                        value: shown,
                        setting_type,
                        required: def.required,
                        description: def.description.to_string(),
                        has_value,
                    },
                )
            })
            .collect()
    }

    /// Check which features are properly configured.
    pub fn check_feature_status(&self) -> FeatureStatus {
        let mut status = FeatureStatus {
            gemini_configured: true,
            auto_connect: false,
            missing_settings: Vec::new(),
            warnings: Vec::new(),
        };

        for def in DEFAULT_SETTINGS.values().filter(|d| d.required) {
            if self.raw(def.key).is_none() {
                status.missing_settings.push(def.key.to_string());
            }
        }
        status.missing_settings.sort();
        if status
            .missing_settings
            .iter()
            .any(|k| k == "GEMINI_API_KEY")
        {
            status.gemini_configured = false;
            status
                .warnings
                .push("GEMINI_API_KEY is not set - trivia and story cannot load content".into());
        }

        for (key, value) in &self.values {
            if value.trim().is_empty() {
                continue;
            }
            if let Err(e) = validate_setting(key, value) {
                status
                    .warnings
                    .push(format!("{key}: {e}; default value is used"));
            }
        }
        status.warnings.sort();

        status.auto_connect = self.raw("DEFAULT_CHANNEL").is_some();
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(pairs: &[(&str, &str)]) -> SettingsManager {
        SettingsManager::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_values_use_defaults() {
        let sm = manager(&[]);
        assert_eq!(sm.get_setting("SERVER_PORT").unwrap(), "8080");
        assert_eq!(sm.get_setting("TRIVIA_TOPIC").unwrap(), "general knowledge");
        assert!(sm.get_setting("UNKNOWN").is_err());
    }

    #[test]
    fn invalid_values_fall_back() {
        let sm = manager(&[("SERVER_PORT", "eighty"), ("TRIVIA_SECONDS", "2")]);
        assert_eq!(sm.get_setting("SERVER_PORT").unwrap(), "8080");
        assert_eq!(sm.get_setting("TRIVIA_SECONDS").unwrap(), "20");

        let status = sm.check_feature_status();
        assert!(status.warnings.iter().any(|w| w.starts_with("SERVER_PORT")));
        assert!(status.warnings.iter().any(|w| w.starts_with("TRIVIA_SECONDS")));
    }

    #[test]
    fn api_key_alias_is_accepted() {
        let sm = manager(&[("API_KEY", "abc")]);
        assert_eq!(sm.get_setting("GEMINI_API_KEY").unwrap(), "abc");
        assert!(sm.check_feature_status().gemini_configured);

        let sm = manager(&[("API_KEY", "alias"), ("GEMINI_API_KEY", "primary")]);
        assert_eq!(sm.get_setting("GEMINI_API_KEY").unwrap(), "primary");
    }

    #[test]
    fn secrets_are_masked() {
        let sm = manager(&[("GEMINI_API_KEY", "very-secret")]);
        let all = sm.get_all_settings();
        let key = &all["GEMINI_API_KEY"];
        assert_eq!(key.value, MASK);
        assert!(key.has_value);
        assert_eq!(key.setting_type, SettingType::Secret);
        assert_eq!(all["SERVER_PORT"].value, "8080");
    }

    #[test]
    fn feature_status_reports_missing_key() {
        let status = manager(&[]).check_feature_status();
        assert!(!status.gemini_configured);
        assert!(!status.auto_connect);
        assert_eq!(status.missing_settings, vec!["GEMINI_API_KEY".to_string()]);

        let status = manager(&[("GEMINI_API_KEY", "k"), ("DEFAULT_CHANNEL", "shroud")])
            .check_feature_status();
        assert!(status.missing_settings.is_empty());
        assert!(status.auto_connect);
    }
}
