//! Settings storage backends

use crate::{Settings, SettingsError, SettingsResult, APP_NAME, SETTINGS_FILE_NAME};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable storage for the [`Settings`] record
///
/// `load` never fails: anything unreadable is treated as "no settings yet".
/// `save` reports failures so the caller can tell the user, but a failed
/// save must never take the application down.
pub trait PreferenceStore: Send + Sync {
    /// Reads the stored settings, or defaults if there are none
    fn load(&self) -> Settings;

    /// Replaces the stored settings
    fn save(&self, settings: &Settings) -> SettingsResult<()>;

    /// Reads the directory of the last successful save
    fn load_last_dir(&self) -> Option<PathBuf> {
        self.load().last_save_dir
    }

    /// Remembers `dir` as the directory of the last successful save,
    /// keeping every other stored value
    fn save_last_dir(&self, dir: &Path) -> SettingsResult<()> {
        let mut settings = self.load();
        settings.last_save_dir = Some(dir.to_path_buf());
        self.save(&settings)
    }
}

/// Settings stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first [`PreferenceStore::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store in the per-user configuration directory
    pub fn for_user() -> SettingsResult<Self> {
        let dirs = ProjectDirs::from("", "", APP_NAME).ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE_NAME)))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> SettingsError {
        SettingsError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Settings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {}", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed settings in {}: {}", self.path.display(), e);
            Settings::default()
        })
    }

    fn save(&self, settings: &Settings) -> SettingsResult<()> {
        let json = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.write_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("config").join(SETTINGS_FILE_NAME))
    }

    #[test]
    fn test_load_fresh_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), Settings::default());
        assert!(store.load_last_dir().is_none());
    }

    #[test]
    fn test_save_then_load_last_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save_last_dir(dir.path()).unwrap();
        assert_eq!(store.load_last_dir().as_deref(), Some(dir.path()));
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_last_dir_keeps_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&Settings {
                last_save_dir: None,
                zoom: 170,
            })
            .unwrap();
        store.save_last_dir(dir.path()).unwrap();

        let settings = store.load();
        assert_eq!(settings.zoom, 170);
        assert_eq!(settings.last_save_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let first = dir.path().join("first");
        let second = dir.path().join("second");

        store.save_last_dir(&first).unwrap();
        store.save_last_dir(&second).unwrap();
        assert_eq!(store.load_last_dir(), Some(second));
    }

    // macOS file systems reject names that are not UTF-8
    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_then_load_non_utf8_directory() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let cafe = dir.path().join(OsStr::from_bytes(b"caf\xe9"));
        fs::create_dir(&cafe).unwrap();

        store.save_last_dir(&cafe).unwrap();
        assert_eq!(store.load_last_dir(), Some(cafe.clone()));
        assert_eq!(store.load().save_dir_or("/fallback"), cafe);
    }

    #[test]
    fn test_load_malformed_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_load_directory_instead_of_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path()).unwrap();

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_save_reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the config directory should be
        let blocker = dir.path().join("config");
        fs::write(&blocker, "").unwrap();
        let store = JsonFileStore::new(blocker.join(SETTINGS_FILE_NAME));

        let result = store.save_last_dir(dir.path());
        assert_matches!(result, Err(SettingsError::Write { .. }));
        assert!(store.load_last_dir().is_none());
    }

    #[test]
    fn test_saved_file_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Settings::default()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["zoom"], 100);
        assert!(value["last_save_dir"].is_null());
    }
}
