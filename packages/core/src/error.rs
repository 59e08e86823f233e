//! Error types for documents, page extraction and saving

use thiserror::Error;

/// Reading or writing a MathPaste file failed
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read or written
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Text content is not valid UTF-8 (or drawing data is not ASCII)
    #[error("the text is not encoded in UTF-8")]
    NotUtf8,

    /// The file starts like a zip but cannot be read as one
    #[error("damaged zip file: {0}")]
    BadZip(#[from] zip::result::ZipError),

    /// A readable zip without the entries MathPaste needs
    #[error("the zip file does not contain math.txt")]
    NotMathPasteZip,

    /// The drawing export from the page is not a base64 PNG data URL
    #[error("the drawing is not a base64 PNG data URL")]
    BadImageDataUrl,
}

impl DocumentError {
    /// A sentence suitable for an error dialog
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => e.to_string(),
            Self::NotUtf8 => "The text doesn't seem to be encoded in UTF-8.".to_string(),
            Self::BadZip(_) => "The zip file seems to be damaged.".to_string(),
            Self::NotMathPasteZip => {
                "The zip file is not compatible with MathPaste Desktop.".to_string()
            }
            Self::BadImageDataUrl => "The drawing could not be exported.".to_string(),
        }
    }
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Getting the current document out of the embedded page failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The page has not finished loading the MathPaste application
    #[error("the MathPaste page has not finished loading")]
    NotLoaded,

    /// The page threw while exporting
    #[error("the MathPaste page reported an error: {0}")]
    Script(String),

    /// The page answered with something that is not a document
    #[error("unexpected answer from the MathPaste page: {0}")]
    Malformed(String),

    /// The page did not answer in time
    #[error("the MathPaste page did not answer within {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The host could not run the export script
    #[error("failed to run script in the page: {0}")]
    Eval(String),

    /// The window went away before the page answered
    #[error("the window was closed before the page answered")]
    Closed,
}

/// Result type for content extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

/// A save action failed; nothing about the preference changed
#[derive(Error, Debug)]
pub enum SaveError {
    /// The document could not be taken from the page; no file was written
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The document could not be written
    #[error(transparent)]
    Write(#[from] DocumentError),
}

impl SaveError {
    /// A sentence suitable for an error dialog
    pub fn user_message(&self) -> String {
        match self {
            Self::Extract(e) => format!("Could not get the math from the page: {}.", e),
            Self::Write(e) => e.user_message(),
        }
    }
}

/// Bridge URL could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Not a `mathpaste-bridge://` URL
    #[error("not a bridge URL: {0}")]
    NotBridgeUrl(String),

    /// Bridge URL with an unknown message kind
    #[error("unknown bridge message: {0}")]
    UnknownMessage(String),

    /// Reply without a usable `id`
    #[error("reply has a missing or invalid id")]
    InvalidId,

    /// Reply with neither `data` nor `error`
    #[error("reply {0} carries no data")]
    MissingPayload(u64),
}
