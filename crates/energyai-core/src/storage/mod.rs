mod config;
pub mod store;

pub use config::{Config, PracticeConfig, ServerConfig};
pub use store::{keys, PointAward, Store};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `ENERGYAI_HOME` overrides the location entirely. Otherwise it is
/// `~/.config/energyai-academy[-dev]/`, with the `-dev` suffix when
/// `ENERGYAI_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ENERGYAI_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ENERGYAI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("energyai-academy-dev")
            } else {
                base_dir.join("energyai-academy")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(StorageError::DataDir)?;
    Ok(dir)
}
