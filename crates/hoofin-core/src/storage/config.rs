//! TOML-based application configuration.
//!
//! Stores user preferences: sound cues (enabled, volume) and display
//! behavior (keep screen on). Stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

use super::data_dir;

/// Sound cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub keep_screen_on: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Handle shared between the settings screen and the controller.
pub type SharedConfig = Arc<Mutex<AppConfig>>;

fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    0.7
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.7,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            keep_screen_on: true,
        }
    }
}

impl AppConfig {
    fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file if none exists.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, StorageError> {
        Self::load_at(&Self::path()?)
    }

    /// Defaults are written only when the file is genuinely absent; any
    /// other read failure surfaces so an existing file is never clobbered.
    fn load_at(path: &Path) -> Result<Self, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| StorageError::ConfigLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_at(path)?;
                Ok(cfg)
            }
            Err(e) => Err(StorageError::ConfigLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), StorageError> {
        self.save_at(&Self::path()?)
    }

    fn save_at(&self, path: &Path) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(self).map_err(|e| StorageError::ConfigSave {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| StorageError::ConfigSave {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn into_shared(self) -> SharedConfig {
        Arc::new(Mutex::new(self))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save. The new value must
    /// parse as the same JSON type as the existing one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let invalid = |message: &str| StorageError::InvalidConfigValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        let mut json =
            serde_json::to_value(&*self).map_err(|e| invalid(&e.to_string()))?;

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(invalid("config key is empty"));
        }

        let mut current = &mut json;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| invalid("unknown config key"))?;
                let existing = obj.get(part).ok_or_else(|| invalid("unknown config key"))?;
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(&e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<f64>().map_err(|e| invalid(&e.to_string()))?;
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid("not a finite number"))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };
                obj.insert(part.to_string(), new_value);
                break;
            }
            current = current
                .get_mut(part)
                .ok_or_else(|| invalid("unknown config key"))?;
        }

        *self = serde_json::from_value(json).map_err(|e| invalid(&e.to_string()))?;
        self.save()?;
        Ok(())
    }
}
