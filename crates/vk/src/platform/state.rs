//! Location of the CLI data directory.
//!
//! - `$VK_APPDATA_DIR` when set
//! - `~/.config/vaultkeep` (Unix) or `%APPDATA%\vaultkeep` (Windows) otherwise
//!
//! The directory is created with mode 0700 and holds a single `data.json` (mode 0600), see
//! [JsonFileStore].

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use vaultkeep_state::{JsonFileStore, StoreError};

pub const APPDATA_ENV: &str = "VK_APPDATA_DIR";

const APP_DIR_NAME: &str = "vaultkeep";

/// Errors that can occur while opening the CLI state.
#[derive(Debug, Error)]
pub enum StateError {
    /// Config directory not found (HOME or APPDATA not set).
    #[error("Config directory not found, set {APPDATA_ENV} or HOME (APPDATA on Windows)")]
    ConfigDirNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Get the CLI data directory
fn get_data_dir() -> Result<PathBuf, StateError> {
    if let Some(dir) = std::env::var_os(APPDATA_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = dirs::config_dir().ok_or(StateError::ConfigDirNotFound)?;
        Ok(appdata.join(APP_DIR_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().ok_or(StateError::ConfigDirNotFound)?;
        Ok(home.join(".config").join(APP_DIR_NAME))
    }
}

/// Open the store in the data directory, creating the directory if needed.
pub(crate) fn open_store() -> Result<JsonFileStore, StateError> {
    let dir = get_data_dir()?;
    debug!(dir = %dir.display(), "using data directory");
    Ok(JsonFileStore::open(dir)?)
}
