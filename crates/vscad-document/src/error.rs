//! Error types for vscad-document.

use thiserror::Error;

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while loading or persisting documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this name is open or persisted.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The document exists but is not open.
    #[error("document not open: {0}")]
    NotOpen(String),

    /// The persisted file holds a document under a different name.
    #[error("document file {file} contains document {found}")]
    NameMismatch {
        /// Name the file was looked up by.
        file: String,
        /// Name recorded inside the file.
        found: String,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
