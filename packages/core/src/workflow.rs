//! Save workflow
//!
//! Everything the save action does once the user has picked a path:
//! take the document from the page, write it, remember the directory.
//! The page and the preference store come in through traits so the
//! workflow runs the same against the real webview and against test
//! doubles.

use crate::document::{write_document, FileType, MathDocument};
use crate::error::{ExtractResult, SaveError};
use mathpaste_settings::{PreferenceStore, Settings, SettingsError};
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Something that can hand out the user's current document
pub trait ContentSource {
    /// Fetches the exportable document from the page
    fn extract_content(&self) -> impl Future<Output = ExtractResult<MathDocument>> + Send;
}

/// A finished save
#[derive(Debug)]
pub struct SaveOutcome {
    /// What was written
    pub document: MathDocument,

    /// Directory that now is the default for the next dialog
    pub directory: Option<PathBuf>,

    /// The file was saved as text although the page had a drawing
    pub drawing_dropped: bool,

    /// Remembering the directory failed; the file itself is saved
    pub preference_error: Option<SettingsError>,
}

/// Saves the page's document to `path`
///
/// Nothing is written when extraction fails, and the remembered directory
/// only changes after the file was written. The directory goes into
/// `settings`, the live record read at startup, and that record is what
/// gets stored. A failure to store it is reported in the outcome, not as
/// an error.
pub async fn save_document<C, S>(
    source: &C,
    store: &S,
    settings: &Mutex<Settings>,
    path: &Path,
    file_type: FileType,
) -> Result<SaveOutcome, SaveError>
where
    C: ContentSource,
    S: PreferenceStore + ?Sized,
{
    let document = source.extract_content().await?;
    write_document(path, file_type, &document)?;

    tracing::info!("Saved {}", path.display());

    let directory = containing_directory(path);
    let preference_error = match &directory {
        Some(dir) => {
            let snapshot = {
                let mut settings = settings.lock();
                settings.last_save_dir = Some(dir.clone());
                settings.clone()
            };
            store.save(&snapshot).err()
        }
        None => None,
    };
    if let Some(e) = &preference_error {
        tracing::warn!("Saved file but could not remember its directory: {}", e);
    }

    Ok(SaveOutcome {
        drawing_dropped: file_type == FileType::Text && document.has_drawing(),
        document,
        directory,
        preference_error,
    })
}

/// The directory a saved file lives in
///
/// Relative paths are resolved against the current directory. Symlinks are
/// kept as they are, so the directory is the one the user picked.
pub fn containing_directory(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    if parent.is_absolute() {
        return Some(parent.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    if parent.as_os_str().is_empty() {
        Some(cwd)
    } else {
        Some(cwd.join(parent))
    }
}
