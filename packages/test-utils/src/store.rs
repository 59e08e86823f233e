//! In-memory preference store
//!
//! # Lock Poisoning Recovery
//!
//! Locks are taken with `unwrap_or_else(|e| e.into_inner())`, so a test
//! that panics while holding one does not poison the store for others.

use mathpaste_settings::{PreferenceStore, Settings, SettingsError, SettingsResult};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Preference store that keeps settings in memory
///
/// Clones share the same settings, so a test can hand one clone to the
/// code under test and inspect the other.
///
/// # Example
///
/// ```rust
/// use mathpaste_settings::PreferenceStore;
/// use mathpaste_test_utils::MemoryPreferenceStore;
/// use std::path::Path;
///
/// let store = MemoryPreferenceStore::new();
/// store.save_last_dir(Path::new("/tmp")).unwrap();
/// assert_eq!(store.load_last_dir().as_deref(), Some(Path::new("/tmp")));
/// ```
#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    settings: Arc<RwLock<Settings>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryPreferenceStore {
    /// Create an empty store, as on first run
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already remembers `dir`
    pub fn with_last_dir(dir: impl Into<PathBuf>) -> Self {
        let store = Self::new();
        store.settings.write().unwrap_or_else(|e| e.into_inner()).last_save_dir =
            Some(dir.into());
        store
    }

    /// Make every following `save` fail like an unwritable config directory
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `save` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, settings: &Settings) -> SettingsResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SettingsError::Write {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }

        *self.settings.write().unwrap_or_else(|e| e.into_inner()) = settings.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
