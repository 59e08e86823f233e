//! Shared test utilities for the MathPaste Desktop workspace
//!
//! This crate provides in-memory stand-ins for the two things the save
//! workflow talks to, so tests run without a webview or a config
//! directory.
//!
//! # Doubles
//!
//! - [`MemoryPreferenceStore`] - settings kept in memory, optionally failing writes
//! - [`ScriptedContentSource`] - a page that answers with a fixed document or error
//!
//! # Example
//!
//! ```rust,ignore
//! use mathpaste_test_utils::{MemoryPreferenceStore, ScriptedContentSource, fixtures};
//!
//! #[tokio::test]
//! async fn test_save() {
//!     let store = MemoryPreferenceStore::new();
//!     let settings = parking_lot::Mutex::new(store.load());
//!     let page = ScriptedContentSource::returning(fixtures::text_document());
//!     // save_document(&page, &store, &settings, path, FileType::Text).await
//! }
//! ```

mod content;
pub mod fixtures;
mod store;

pub use content::ScriptedContentSource;
pub use store::MemoryPreferenceStore;
