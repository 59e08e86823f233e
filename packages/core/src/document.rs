//! MathPaste files on disk
//!
//! Two formats exist. A text file holds the math verbatim and nothing else.
//! A zip file holds `math.txt`, and when something was drawn also
//! `drawing-data.txt` (the page's own drawing encoding) and `drawing.png`
//! (a rendered copy for other programs). Reading sniffs the zip magic, so
//! the extension of an existing file does not matter.

use crate::error::{DocumentError, DocumentResult};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const MATH_ENTRY: &str = "math.txt";
const DRAWING_DATA_ENTRY: &str = "drawing-data.txt";
const DRAWING_PNG_ENTRY: &str = "drawing.png";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// On-disk format of a MathPaste file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Math only, the drawing is dropped
    Text,
    /// Math and drawing
    Zip,
}

impl FileType {
    /// Every format, in the order dialogs list them
    pub const ALL: [FileType; 2] = [FileType::Text, FileType::Zip];

    /// Filter name shown in file dialogs
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text files (no drawing)",
            Self::Zip => "Zip files (text and drawing)",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Text => &["txt"],
            Self::Zip => &["zip"],
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Zip => "application/zip",
        }
    }

    /// Format to save as, judged by the file name a user picked
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zip") => Self::Zip,
            _ => Self::Text,
        }
    }
}

/// The user's document as the MathPaste page exports it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathDocument {
    pub math: String,

    /// Page-specific drawing encoding, empty when nothing was drawn
    #[serde(default)]
    pub image_string: String,

    /// The drawing rendered as a PNG data URL
    #[serde(default)]
    pub image_data_url: Option<String>,
}

impl MathDocument {
    /// A document with math and no drawing
    pub fn from_math(math: impl Into<String>) -> Self {
        Self {
            math: math.into(),
            ..Self::default()
        }
    }

    pub fn has_drawing(&self) -> bool {
        !self.image_string.is_empty()
    }
}

/// Reads any file MathPaste Desktop saves
pub fn read_document(path: &Path) -> DocumentResult<(FileType, MathDocument)> {
    let bytes = fs::read(path)?;

    if bytes.starts_with(ZIP_MAGIC) {
        let document = read_zip(Cursor::new(bytes))?;
        Ok((FileType::Zip, document))
    } else {
        let math = String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8)?;
        Ok((FileType::Text, MathDocument::from_math(math)))
    }
}

/// Writes `document` to `path` in the given format
///
/// Zip files are assembled in memory first, so an encoding failure leaves
/// no file behind.
pub fn write_document(
    path: &Path,
    file_type: FileType,
    document: &MathDocument,
) -> DocumentResult<()> {
    let bytes = match file_type {
        FileType::Text => document.math.as_bytes().to_vec(),
        FileType::Zip => encode_zip(document)?,
    };
    fs::write(path, bytes)?;

    tracing::debug!(
        "Wrote {:?} document to {} (drawing: {})",
        file_type,
        path.display(),
        document.has_drawing()
    );
    Ok(())
}

fn read_zip<R: Read + Seek>(reader: R) -> DocumentResult<MathDocument> {
    let mut archive = ZipArchive::new(reader)?;

    let math = read_entry(&mut archive, MATH_ENTRY)?.ok_or(DocumentError::NotMathPasteZip)?;
    let math = String::from_utf8(math).map_err(|_| DocumentError::NotUtf8)?;

    // Zips written without a drawing have no drawing-data.txt
    let image_string = match read_entry(&mut archive, DRAWING_DATA_ENTRY)? {
        Some(bytes) if bytes.is_ascii() => {
            String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8)?
        }
        Some(_) => return Err(DocumentError::NotUtf8),
        None => String::new(),
    };

    Ok(MathDocument {
        math,
        image_string,
        image_data_url: None,
    })
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> DocumentResult<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            Ok(Some(bytes))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn encode_zip(document: &MathDocument) -> DocumentResult<Vec<u8>> {
    let png = if document.has_drawing() {
        Some(decode_png_data_url(document.image_data_url.as_deref())?)
    } else {
        None
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.start_file(MATH_ENTRY, SimpleFileOptions::default())?;
    writer.write_all(document.math.as_bytes())?;

    if let Some(png) = png {
        writer.start_file(DRAWING_DATA_ENTRY, SimpleFileOptions::default())?;
        writer.write_all(document.image_string.as_bytes())?;
        writer.start_file(DRAWING_PNG_ENTRY, SimpleFileOptions::default())?;
        writer.write_all(&png)?;
    }

    Ok(writer.finish()?.into_inner())
}

fn decode_png_data_url(data_url: Option<&str>) -> DocumentResult<Vec<u8>> {
    let encoded = data_url
        .and_then(|url| url.strip_prefix(PNG_DATA_URL_PREFIX))
        .ok_or(DocumentError::BadImageDataUrl)?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| DocumentError::BadImageDataUrl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn drawing_document() -> MathDocument {
        MathDocument {
            math: "x^2 + y^2 = r^2".to_string(),
            image_string: "l0,0;10,10".to_string(),
            image_data_url: Some(format!(
                "{}{}",
                PNG_DATA_URL_PREFIX,
                base64::engine::general_purpose::STANDARD.encode(b"\x89PNG fake")
            )),
        }
    }

    #[rstest]
    #[case("math.zip", FileType::Zip)]
    #[case("math.ZIP", FileType::Zip)]
    #[case("math.txt", FileType::Text)]
    #[case("math", FileType::Text)]
    #[case("archive.zip.txt", FileType::Text)]
    fn test_file_type_from_path(#[case] name: &str, #[case] expected: FileType) {
        assert_eq!(FileType::from_path(Path::new(name)), expected);
    }

    #[test]
    fn test_document_deserializes_page_export() {
        let json = r#"{"math": "a", "imageString": "", "imageDataUrl": null}"#;
        let document: MathDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document, MathDocument::from_math("a"));
        assert!(!document.has_drawing());
    }

    #[test]
    fn test_text_file_is_math_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.txt");

        write_document(&path, FileType::Text, &drawing_document()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"x^2 + y^2 = r^2");

        let (file_type, document) = read_document(&path).unwrap();
        assert_eq!(file_type, FileType::Text);
        assert_eq!(document, MathDocument::from_math("x^2 + y^2 = r^2"));
    }

    #[test]
    fn test_zip_keeps_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.zip");
        let saved = drawing_document();

        write_document(&path, FileType::Zip, &saved).unwrap();
        let (file_type, document) = read_document(&path).unwrap();

        assert_eq!(file_type, FileType::Zip);
        assert_eq!(document.math, saved.math);
        assert_eq!(document.image_string, saved.image_string);

        let mut archive = ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        let png = read_entry(&mut archive, DRAWING_PNG_ENTRY).unwrap();
        assert_eq!(png.as_deref(), Some(&b"\x89PNG fake"[..]));
    }

    #[test]
    fn test_zip_without_drawing_has_only_math() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.zip");

        write_document(&path, FileType::Zip, &MathDocument::from_math("1 + 1")).unwrap();

        let archive = ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names, vec![MATH_ENTRY]);

        let (_, document) = read_document(&path).unwrap();
        assert_eq!(document, MathDocument::from_math("1 + 1"));
    }

    #[test]
    fn test_zip_with_bad_data_url_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.zip");
        let document = MathDocument {
            image_data_url: Some("data:image/jpeg;base64,AAAA".to_string()),
            ..drawing_document()
        };

        let result = write_document(&path, FileType::Zip, &document);
        assert_matches!(result, Err(DocumentError::BadImageDataUrl));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_zip_without_math_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.zip");

        let mut writer = ZipWriter::new(fs::File::create(&path).unwrap());
        writer
            .start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();

        assert_matches!(read_document(&path), Err(DocumentError::NotMathPasteZip));
    }

    #[test]
    fn test_read_damaged_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.zip");
        fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();

        assert_matches!(read_document(&path), Err(DocumentError::BadZip(_)));
    }

    #[test]
    fn test_read_non_utf8_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0x66, 0x6f, 0xf6]).unwrap();

        assert_matches!(read_document(&path), Err(DocumentError::NotUtf8));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_document(&dir.path().join("missing.txt"));
        assert_matches!(result, Err(DocumentError::Io(_)));
    }
}
