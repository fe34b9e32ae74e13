//! Error types for the document-reconstruction library.
//!
//! The reconstruction core itself degrades silently on ambiguous input
//! (rejected table candidates, missing image files, malformed field names);
//! these error types surface only where XML emission can genuinely fail.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document serialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML emission error
    #[error("XML emission error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while writing a part buffer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A part buffer did not contain valid UTF-8
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A scene JSON document failed to parse
    #[error("Scene JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid scene input (violates the documented input contract)
    #[error("Invalid scene: {0}")]
    InvalidScene(String),
}
