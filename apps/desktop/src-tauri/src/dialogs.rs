//! File choosers and message boxes
//!
//! The dialog plugin reports through callbacks; these wrappers turn the
//! callbacks into futures so a file action can simply await the user.

use mathpaste_core::FileType;
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Runtime};
use tauri_plugin_dialog::{DialogExt, FileDialogBuilder, FilePath, MessageDialogKind};
use tokio::sync::oneshot;

fn file_dialog<R: Runtime>(
    app: &AppHandle<R>,
    title: &str,
    directory: &Path,
    file_name: Option<String>,
) -> FileDialogBuilder<R> {
    let mut dialog = app
        .dialog()
        .file()
        .set_title(title)
        .set_directory(directory);
    if let Some(name) = file_name {
        dialog = dialog.set_file_name(name);
    }
    for file_type in FileType::ALL {
        dialog = dialog.add_filter(file_type.label(), file_type.extensions());
    }
    dialog
}

fn into_local_path(path: Option<FilePath>) -> Option<PathBuf> {
    path.and_then(|path| match path.into_path() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!("Dialog returned a non-local path: {}", e);
            None
        }
    })
}

/// Asks where to save; `None` if the user cancelled
pub async fn choose_save_path<R: Runtime>(
    app: &AppHandle<R>,
    directory: &Path,
    file_name: Option<String>,
) -> Option<PathBuf> {
    let (tx, rx) = oneshot::channel();
    file_dialog(app, "Save Math", directory, file_name).save_file(move |path| {
        let _ = tx.send(into_local_path(path));
    });
    rx.await.ok().flatten()
}

/// Asks which file to open; `None` if the user cancelled
pub async fn choose_open_path<R: Runtime>(
    app: &AppHandle<R>,
    directory: &Path,
    file_name: Option<String>,
) -> Option<PathBuf> {
    let (tx, rx) = oneshot::channel();
    file_dialog(app, "Open Math", directory, file_name)
        .add_filter("All files", &["*"])
        .pick_file(move |path| {
            let _ = tx.send(into_local_path(path));
        });
    rx.await.ok().flatten()
}

fn message<R: Runtime>(app: &AppHandle<R>, kind: MessageDialogKind, title: &str, text: &str) {
    app.dialog()
        .message(text)
        .title(title)
        .kind(kind)
        .show(|_| {});
}

pub fn show_error<R: Runtime>(app: &AppHandle<R>, title: &str, text: &str) {
    message(app, MessageDialogKind::Error, title, text);
}

pub fn show_warning<R: Runtime>(app: &AppHandle<R>, title: &str, text: &str) {
    message(app, MessageDialogKind::Warning, title, text);
}
