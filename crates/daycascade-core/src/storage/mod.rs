mod config;
pub mod json_store;
pub mod store;

pub use config::{Config, PlacementConfig, TimelineConfig};
pub use json_store::JsonFileStore;
pub use store::{MemoryStore, ScheduleStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/daycascade[-dev]/` based on DAYCASCADE_ENV.
///
/// Set DAYCASCADE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYCASCADE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daycascade-dev")
    } else {
        base_dir.join("daycascade")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
