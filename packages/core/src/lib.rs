//! Core of MathPaste Desktop
//!
//! The desktop shell embeds the remote MathPaste page and adds local files.
//! This crate holds everything that does not need a window:
//!
//! - [`document`] - the text and zip file formats
//! - [`bridge`] - the script/URL protocol for talking to the page
//! - [`navigation`] - which URLs the webview may load
//! - [`workflow`] - the save action behind a [`ContentSource`]
//! - [`session`] and [`zoom`] - window state

pub mod bridge;
pub mod document;
pub mod error;
pub mod navigation;
pub mod session;
pub mod workflow;
pub mod zoom;

pub use document::{read_document, write_document, FileType, MathDocument};
pub use error::{
    BridgeError, DocumentError, DocumentResult, ExtractError, ExtractResult, SaveError,
};
pub use navigation::{classify, Navigation, MATHPASTE_URL};
pub use session::Session;
pub use workflow::{save_document, ContentSource, SaveOutcome};
pub use zoom::{Zoom, ZoomAction};
