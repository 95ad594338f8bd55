//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default countdown length and preset durations
//! - The five-minute warning threshold
//! - Speech settings (enabled at startup, rate, pitch)
//!
//! Configuration is stored at `~/.config/chime/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Countdown length used at startup, in minutes.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Remaining-seconds threshold for the early warning.
    #[serde(default = "default_warning_seconds")]
    pub warning_seconds: u64,
    /// Preset durations offered by the UI, in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            warning_seconds: default_warning_seconds(),
            presets: default_presets(),
        }
    }
}

/// Speech configuration.
///
/// Rate and pitch match the original widget's kid-friendly voice:
/// slightly slower, slightly higher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rate")]
    pub rate: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: default_rate(),
            pitch: default_pitch(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chime/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_minutes() -> u32 {
    30
}
fn default_warning_seconds() -> u64 {
    300
}
fn default_presets() -> Vec<u32> {
    vec![5, 10, 60]
}
fn default_true() -> bool {
    true
}
fn default_rate() -> f32 {
    0.9
}
fn default_pitch() -> f32 {
    1.1
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is
    /// absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the config.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}
