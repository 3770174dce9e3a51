mod config;
pub mod database;
pub mod position;

pub use config::{AppConfig, DisplayConfig, SharedConfig, SoundConfig};
pub use database::Database;
pub use position::{PositionStore, WorkoutPosition};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/hoofin[-dev]/` based on HOOFIN_ENV.
///
/// Set HOOFIN_DATA_DIR to override the location entirely (used by tests),
/// or HOOFIN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = if let Ok(override_dir) = std::env::var("HOOFIN_DATA_DIR") {
        PathBuf::from(override_dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("HOOFIN_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("hoofin-dev")
        } else {
            base_dir.join("hoofin")
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
