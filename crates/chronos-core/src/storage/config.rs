//! TOML-based application configuration.
//!
//! Stores the user preferences the timer and CLI consume: the default
//! pomodoro duration, completion cues, appearance, and the optional
//! cloud mirror endpoint. Lives at `~/.config/chronos/config.toml`.
//! Values are addressable by dot-separated keys (`timer.pomodoro_minutes`)
//! for the CLI's `config get`/`config set`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::timer::{CompletionCues, SoundType};

/// Timer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Default planned duration when the timer is idle.
    #[serde(default = "default_pomodoro_minutes")]
    pub pomodoro_minutes: u32,
    /// Upper bound of the duration dial.
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
}

/// Completion cue preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_sound")]
    pub sound: SoundType,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
}

/// Appearance. Irrelevant to core logic but part of the persisted and
/// mirrored app state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Optional best-effort cloud mirror. Both fields must be present for
/// sync to be attempted at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Application configuration, serialized to/from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_pomodoro_minutes() -> u32 {
    35
}
fn default_max_minutes() -> u32 {
    120
}
fn default_true() -> bool {
    true
}
fn default_sound() -> SoundType {
    SoundType::Digital
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_minutes(),
            max_minutes: default_max_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound: SoundType::Digital,
            vibration_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            notifications: NotificationsConfig::default(),
            ui: UiConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed,
    /// or the defaults cannot be written.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(Self::path()?)
    }

    fn load_from(path: PathBuf) -> Result<Self, CoreError> {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            // Only an absent file counts as first run; an unreadable
            // one must not be clobbered with defaults.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(&path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The cue subset the timer's completion announcement consumes.
    pub fn completion_cues(&self) -> CompletionCues {
        CompletionCues {
            sound_enabled: self.notifications.sound_enabled,
            sound: self.notifications.sound,
            vibration_enabled: self.notifications.vibration_enabled,
        }
    }

    /// Get a value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let root = serde_json::to_value(self).ok()?;
        let value = key.split('.').try_fold(&root, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, preserving the existing type,
    /// and persist the result.
    ///
    /// # Errors
    /// Rejects unknown keys and values that do not parse as the field's
    /// current type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut root = serde_json::to_value(&*self)?;
        set_by_path(&mut root, key, value)?;
        *self = serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()
    }
}

fn set_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let (parent_path, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    let mut node = root;
    if let Some(parent_path) = parent_path {
        for part in parent_path.split('.') {
            node = node.get_mut(part).ok_or_else(unknown)?;
        }
    }
    let object = node.as_object_mut().ok_or_else(unknown)?;
    let existing = object.get(leaf).ok_or_else(unknown)?;

    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let new_value = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
        ),
        serde_json::Value::Number(_) => value
            .parse::<u64>()
            .map(|n| serde_json::Value::Number(n.into()))
            .map_err(|e| invalid(e.to_string()))?,
        // Strings, nulls (optional fields), and enums arrive as strings.
        _ => serde_json::Value::String(value.to_string()),
    };
    object.insert(leaf.to_string(), new_value);
    Ok(())
}
