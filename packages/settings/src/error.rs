//! Settings error types

use std::path::PathBuf;
use thiserror::Error;

/// Settings persistence errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The platform exposes no per-user configuration directory
    #[error("no per-user configuration directory is available")]
    NoConfigDir,

    /// Writing the settings file failed
    #[error("failed to write settings to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded as JSON
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
