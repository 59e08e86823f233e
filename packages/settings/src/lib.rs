//! Persisted settings for MathPaste Desktop
//!
//! This crate owns the single per-user settings record: the directory the
//! last successful save went to, and the webview zoom level. The record is
//! read once at startup and written after each successful save.

mod error;
mod path_serde;
mod store;

pub use error::{SettingsError, SettingsResult};
pub use store::{JsonFileStore, PreferenceStore};

use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for the per-user config directory
pub const APP_NAME: &str = "mathpaste-desktop";

/// File name of the settings record inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Zoom level used when nothing has been saved yet, in percent
pub const DEFAULT_ZOOM: u32 = 100;

/// The persisted settings record
///
/// Missing keys take their defaults and unknown keys are ignored, so files
/// written by older or newer versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory of the last successful save
    ///
    /// It existed when it was written, but may have been removed since.
    /// Use [`Settings::save_dir_or`] instead of reading it directly.
    #[serde(with = "path_serde")]
    pub last_save_dir: Option<PathBuf>,

    /// Webview zoom in percent
    pub zoom: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_save_dir: None,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Settings {
    /// Returns the remembered save directory if it is still a directory,
    /// otherwise `fallback`.
    pub fn save_dir_or(&self, fallback: impl Into<PathBuf>) -> PathBuf {
        self.last_save_dir
            .as_deref()
            .filter(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback.into())
    }
}

/// The platform default directory for file dialogs: the user's home
/// directory, or the current directory when there is no home.
pub fn default_save_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
