//! Application state shared by the controller, the menu and the webview
//! callbacks. Lives in Tauri managed state.

use mathpaste_core::bridge::PendingReplies;
use mathpaste_core::{MathDocument, Session};
use mathpaste_settings::{default_save_dir, JsonFileStore, PreferenceStore, Settings};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Label of the one and only window
pub const MAIN_WINDOW: &str = "main";

pub struct AppState {
    /// Where settings are persisted
    pub store: Arc<dyn PreferenceStore>,

    /// Settings as of now; written on each save and on exit
    pub settings: Mutex<Settings>,

    /// File shown in the window
    pub session: Mutex<Session>,

    /// Directory new file dialogs start in
    pub default_dir: Mutex<PathBuf>,

    /// Export requests waiting for the page
    pub pending: Arc<PendingReplies>,

    /// Document opened before the page finished loading
    pub queued_document: Mutex<Option<MathDocument>>,

    page_loaded: AtomicBool,
}

impl AppState {
    /// Loads settings from the per-user config directory
    pub fn load() -> Self {
        let store = match JsonFileStore::for_user() {
            Ok(store) => store,
            Err(e) => {
                let fallback = std::env::temp_dir()
                    .join(mathpaste_settings::APP_NAME)
                    .join(mathpaste_settings::SETTINGS_FILE_NAME);
                tracing::warn!("{}; keeping settings in {}", e, fallback.display());
                JsonFileStore::new(fallback)
            }
        };
        tracing::debug!("Settings file: {}", store.path().display());
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<dyn PreferenceStore>) -> Self {
        let settings = store.load();
        let default_dir = settings.save_dir_or(default_save_dir());

        Self {
            store,
            settings: Mutex::new(settings),
            session: Mutex::new(Session::new()),
            default_dir: Mutex::new(default_dir),
            pending: Arc::new(PendingReplies::new()),
            queued_document: Mutex::new(None),
            page_loaded: AtomicBool::new(false),
        }
    }

    pub fn is_page_loaded(&self) -> bool {
        self.page_loaded.load(Ordering::SeqCst)
    }

    pub fn set_page_loaded(&self, loaded: bool) {
        self.page_loaded.store(loaded, Ordering::SeqCst);
    }

    /// Points new file dialogs at `dir`
    pub fn set_default_dir(&self, dir: PathBuf) {
        *self.default_dir.lock() = dir;
    }

    /// Writes the current settings to the store
    pub fn persist(&self) {
        let settings = self.settings.lock().clone();
        match self.store.save(&settings) {
            Ok(()) => tracing::debug!("Settings saved"),
            Err(e) => tracing::error!("Failed to save settings: {}", e),
        }
    }
}
