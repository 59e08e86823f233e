//! Main Window Controller
//!
//! Builds the window around the remote page and implements the file and
//! zoom actions. Errors end up in a dialog and in the log; none of them
//! stop the application.

use mathpaste_core::{
    read_document, save_document, ExtractError, FileType, SaveError, Zoom, ZoomAction,
    MATHPASTE_URL,
};
use std::path::{Path, PathBuf};
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::bridge::{self, WebviewContent};
use crate::dialogs;
use crate::navigation;
use crate::state::{AppState, MAIN_WINDOW};

/// Creates the main window and points it at MathPaste
pub fn create_main_window<R: Runtime>(app: &AppHandle<R>) -> anyhow::Result<WebviewWindow<R>> {
    let state = app.state::<AppState>();
    let url = Url::parse(MATHPASTE_URL)?;
    let title = state.session.lock().title();
    let zoom = Zoom::from_percent(state.settings.lock().zoom);

    let handle = app.clone();
    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW, WebviewUrl::External(url))
        .title(title)
        .inner_size(800.0, 600.0)
        // Zoom changes go through the View menu only
        .zoom_hotkeys_enabled(false)
        .on_navigation(move |url| navigation::allow_navigation(&handle, url))
        .on_page_load(|window, payload| match payload.event() {
            PageLoadEvent::Started => {
                window.state::<AppState>().set_page_loaded(false);
            }
            PageLoadEvent::Finished => {
                tracing::info!("Page loaded: {}", payload.url());
                bridge::on_page_loaded(&window);
            }
        })
        .build()?;

    if let Err(e) = window.set_zoom(zoom.factor()) {
        tracing::warn!("Failed to set zoom: {}", e);
    }

    #[cfg(debug_assertions)]
    window.open_devtools();

    Ok(window)
}

fn main_window<R: Runtime>(app: &AppHandle<R>) -> Option<WebviewWindow<R>> {
    let window = app.get_webview_window(MAIN_WINDOW);
    if window.is_none() {
        tracing::warn!("Main window is gone");
    }
    window
}

/// Updates the window title from the session
pub fn refresh_title<R: Runtime>(app: &AppHandle<R>) {
    let title = app.state::<AppState>().session.lock().title();
    if let Some(window) = main_window(app) {
        if let Err(e) = window.set_title(&title) {
            tracing::warn!("Failed to set title: {}", e);
        }
    }
}

/// Where the next file dialog starts
fn dialog_start<R: Runtime>(app: &AppHandle<R>) -> (PathBuf, Option<String>) {
    let state = app.state::<AppState>();
    let default_dir = state.default_dir.lock().clone();
    let start = state.session.lock().dialog_start(&default_dir);
    start
}

/// File > Open
pub async fn open<R: Runtime>(app: AppHandle<R>) {
    let (directory, file_name) = dialog_start(&app);
    match dialogs::choose_open_path(&app, &directory, file_name).await {
        Some(path) => open_path(&app, &path),
        None => tracing::debug!("Open cancelled"),
    }
}

/// Loads `path` into the page, or explains why it can't
pub fn open_path<R: Runtime>(app: &AppHandle<R>, path: &Path) {
    let (file_type, document) = match read_document(path) {
        Ok(read) => read,
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            dialogs::show_error(
                app,
                &format!("Cannot open '{}'", path.display()),
                &e.user_message(),
            );
            return;
        }
    };
    tracing::info!("Opened {} as {:?}", path.display(), file_type);

    let state = app.state::<AppState>();
    match main_window(app) {
        Some(window) if state.is_page_loaded() => bridge::show_document(&window, &document),
        // The page-load handler shows it
        _ => *state.queued_document.lock() = Some(document),
    }

    state.session.lock().set_current_file(path, file_type);
    refresh_title(app);
}

/// File > Save: save to the current file, or ask like Save As
pub async fn save<R: Runtime>(app: AppHandle<R>) {
    let current = {
        let state = app.state::<AppState>();
        let session = state.session.lock();
        session
            .current_file()
            .map(Path::to_path_buf)
            .zip(session.file_type())
    };

    match current {
        Some((path, file_type)) => save_to(&app, path, file_type).await,
        None => save_as(app).await,
    }
}

/// File > Save As
pub async fn save_as<R: Runtime>(app: AppHandle<R>) {
    let (directory, file_name) = dialog_start(&app);
    let Some(path) = dialogs::choose_save_path(&app, &directory, file_name).await else {
        tracing::debug!("Save cancelled");
        return;
    };

    let file_type = FileType::from_path(&path);
    save_to(&app, path, file_type).await;
}

async fn save_to<R: Runtime>(app: &AppHandle<R>, path: PathBuf, file_type: FileType) {
    let state = app.state::<AppState>();
    let result = match main_window(app) {
        Some(window) => {
            let page = WebviewContent::new(window, state.pending.clone());
            save_document(&page, state.store.as_ref(), &state.settings, &path, file_type).await
        }
        None => Err(SaveError::Extract(ExtractError::Closed)),
    };

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Failed to save {}: {}", path.display(), e);
            dialogs::show_error(
                app,
                &format!("Cannot save '{}'", path.display()),
                &e.user_message(),
            );
            return;
        }
    };

    if let Some(dir) = outcome.directory {
        state.set_default_dir(dir);
    }
    state.session.lock().set_current_file(&path, file_type);
    refresh_title(app);

    if let Some(e) = outcome.preference_error {
        dialogs::show_warning(
            app,
            "The folder was not remembered",
            &format!("The file was saved, but the settings could not be written: {}", e),
        );
    }
    if outcome.drawing_dropped {
        dialogs::show_warning(
            app,
            "Your drawing wasn't saved",
            "If you want to save the drawing too, save as a zip file instead of a text file.",
        );
    }
}

/// View > Zoom In / Zoom Out / Reset Zoom
pub fn zoom<R: Runtime>(app: &AppHandle<R>, action: ZoomAction) {
    let zoom = {
        let state = app.state::<AppState>();
        let mut settings = state.settings.lock();
        let zoom = Zoom::from_percent(settings.zoom).apply(action);
        settings.zoom = zoom.percent();
        zoom
    };
    tracing::debug!("Zoom {}%", zoom.percent());

    if let Some(window) = main_window(app) {
        if let Err(e) = window.set_zoom(zoom.factor()) {
            tracing::warn!("Failed to set zoom: {}", e);
        }
    }
}

/// Writes settings on the way out
pub fn persist_settings<R: Runtime>(app: &AppHandle<R>) {
    let state = app.state::<AppState>();
    state.pending.cancel_all();
    state.persist();
}
