//! The synced settings record.
//!
//! Owned by the settings UI; the core consumes only the two limits but
//! seeds the whole record on first install. Stored under the synced-scope
//! key `netflixSettings`, field names in camelCase to match it.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// User-configured limits and playback preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Daily watch-time limit in minutes.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: f64,
    /// Weekly watch-time limit in minutes.
    #[serde(default = "default_weekly_limit")]
    pub weekly_limit: f64,
    #[serde(default = "default_true")]
    pub hide_recommendations: bool,
    #[serde(default = "default_true")]
    pub disable_autoplay: bool,
    #[serde(default = "default_true")]
    pub show_end_time: bool,
}

fn default_daily_limit() -> f64 {
    30.0
}

fn default_weekly_limit() -> f64 {
    200.0
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            weekly_limit: default_weekly_limit(),
            hide_recommendations: true,
            disable_autoplay: true,
            show_end_time: true,
        }
    }
}

impl Settings {
    /// Get a settings value as a string by snake_case key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "daily_limit" => Some(self.daily_limit.to_string()),
            "weekly_limit" => Some(self.weekly_limit.to_string()),
            "hide_recommendations" => Some(self.hide_recommendations.to_string()),
            "disable_autoplay" => Some(self.disable_autoplay.to_string()),
            "show_end_time" => Some(self.show_end_time.to_string()),
            _ => None,
        }
    }

    /// Set a settings value by key. Limits must parse as non-negative
    /// minutes; the rest are booleans.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "daily_limit" => self.daily_limit = parse_minutes(key, value)?,
            "weekly_limit" => self.weekly_limit = parse_minutes(key, value)?,
            "hide_recommendations" => self.hide_recommendations = parse_bool(key, value)?,
            "disable_autoplay" => self.disable_autoplay = parse_bool(key, value)?,
            "show_end_time" => self.show_end_time = parse_bool(key, value)?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<f64, SettingsError> {
    let minutes: f64 = value.parse().map_err(|_| SettingsError::InvalidValue {
        key: key.to_string(),
        message: format!("expected minutes, got '{value}'"),
    })?;
    if minutes < 0.0 || !minutes.is_finite() {
        return Err(SettingsError::InvalidValue {
            key: key.to_string(),
            message: "minutes must be a non-negative number".to_string(),
        });
    }
    Ok(minutes)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        key: key.to_string(),
        message: format!("expected true or false, got '{value}'"),
    })
}
