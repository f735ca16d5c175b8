mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, SyncConfig, TimerConfig, UiConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/chronos[-dev]/` based on CHRONOS_ENV.
///
/// Set CHRONOS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHRONOS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("chronos-dev")
    } else {
        base_dir.join("chronos")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
