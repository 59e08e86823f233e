//! Window session state: which file is open and whether it has changed

use crate::document::FileType;
use std::path::{Path, PathBuf};

/// Suffix of every window title
pub const APP_TITLE: &str = "MathPaste";

/// Title fragment used before anything was opened or saved
const UNTITLED: &str = "New math";

/// The document the window is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current: Option<(PathBuf, FileType)>,
    saved: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            current: None,
            saved: true,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn file_type(&self) -> Option<FileType> {
        self.current.as_ref().map(|(_, file_type)| *file_type)
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// The window now shows `path`, which matches the page content
    pub fn set_current_file(&mut self, path: impl Into<PathBuf>, file_type: FileType) {
        self.current = Some((path.into(), file_type));
        self.saved = true;
    }

    pub fn mark_modified(&mut self) {
        self.saved = false;
    }

    /// Where a file dialog should start: the current file's directory and
    /// name, or `default_dir` when nothing is open
    pub fn dialog_start(&self, default_dir: &Path) -> (PathBuf, Option<String>) {
        let Some(path) = self.current_file() else {
            return (default_dir.to_path_buf(), None);
        };
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_dir.to_path_buf());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        (dir, name)
    }

    /// e.g. `/home/me/notes.txt (text only, modified) - MathPaste`
    pub fn title(&self) -> String {
        let name = match self.current_file() {
            Some(path) => path.display().to_string(),
            None => UNTITLED.to_string(),
        };

        let mut flags = Vec::new();
        if self.file_type() == Some(FileType::Text) {
            flags.push("text only");
        }
        if !self.saved {
            flags.push("modified");
        }

        if flags.is_empty() {
            format!("{} - {}", name, APP_TITLE)
        } else {
            format!("{} ({}) - {}", name, flags.join(", "), APP_TITLE)
        }
    }
}
