//! Lossless JSON encoding for optional paths
//!
//! Paths that are valid UTF-8 are stored as plain strings, which keeps the
//! settings file readable. Anything else is stored as the raw OS encoding:
//! `{"unix_bytes": [..]}` on Unix, `{"windows_wide": [..]}` on Windows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredPath {
    Text(String),
    UnixBytes { unix_bytes: Vec<u8> },
    WindowsWide { windows_wide: Vec<u16> },
}

impl StoredPath {
    fn from_path(path: &Path) -> Self {
        if let Some(text) = path.to_str() {
            return Self::Text(text.to_string());
        }
        os_encoded(path)
    }

    fn into_path(self) -> PathBuf {
        match self {
            Self::Text(text) => PathBuf::from(text),
            Self::UnixBytes { unix_bytes } => PathBuf::from(from_unix_bytes(unix_bytes)),
            Self::WindowsWide { windows_wide } => PathBuf::from(from_windows_wide(windows_wide)),
        }
    }
}

#[cfg(unix)]
fn os_encoded(path: &Path) -> StoredPath {
    use std::os::unix::ffi::OsStrExt;
    StoredPath::UnixBytes {
        unix_bytes: path.as_os_str().as_bytes().to_vec(),
    }
}

#[cfg(windows)]
fn os_encoded(path: &Path) -> StoredPath {
    use std::os::windows::ffi::OsStrExt;
    StoredPath::WindowsWide {
        windows_wide: path.as_os_str().encode_wide().collect(),
    }
}

#[cfg(not(any(unix, windows)))]
fn os_encoded(path: &Path) -> StoredPath {
    StoredPath::Text(path.to_string_lossy().into_owned())
}

#[cfg(unix)]
fn from_unix_bytes(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn from_unix_bytes(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(windows)]
fn from_windows_wide(wide: Vec<u16>) -> OsString {
    use std::os::windows::ffi::OsStringExt;
    OsString::from_wide(&wide)
}

#[cfg(not(windows))]
fn from_windows_wide(wide: Vec<u16>) -> OsString {
    OsString::from(String::from_utf16_lossy(&wide))
}

pub fn serialize<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
    path.as_deref().map(StoredPath::from_path).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
    Ok(Option::<StoredPath>::deserialize(deserializer)?.map(StoredPath::into_path))
}

#[cfg(test)]
mod tests {
    use crate::Settings;
    use std::path::PathBuf;

    #[test]
    fn test_utf8_path_is_a_plain_string() {
        let settings = Settings {
            last_save_dir: Some(PathBuf::from("/home/me/math")),
            ..Settings::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["last_save_dir"], "/home/me/math");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_round_trips() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = PathBuf::from("/tmp").join(OsStr::from_bytes(b"caf\xe9"));
        let settings = Settings {
            last_save_dir: Some(dir.clone()),
            zoom: 130,
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("unix_bytes"));

        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.last_save_dir, Some(dir));
        assert_eq!(loaded.zoom, 130);
    }

    #[test]
    fn test_byte_encoded_path_is_read_back() {
        let settings: Settings =
            serde_json::from_str(r#"{"last_save_dir": {"unix_bytes": [47, 109, 97, 116, 104]}}"#)
                .unwrap();
        assert_eq!(settings.last_save_dir, Some(PathBuf::from("/math")));
    }
}
