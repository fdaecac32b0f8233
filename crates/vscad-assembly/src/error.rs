//! Error types for vscad-assembly.

use thiserror::Error;
use vscad_core::ModelError;
use vscad_document::StoreError;

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Errors raised while importing or exporting assemblies.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A node references a part whose document does not exist.
    #[error("Node '{node}' references missing part document {part}")]
    DanglingPart { node: String, part: String },

    /// A sub-assembly was placed before its document was built.
    #[error("Node '{node}' needs sub-assembly document {document}, which was not built")]
    MissingSubAssembly { node: String, document: String },

    /// A persisted document does not have the expected structure.
    #[error("Invalid document {document}: {reason}")]
    InvalidDocument { document: String, reason: String },

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssemblyError {
    pub fn invalid_document(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            document: document.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_failures_surface_through_the_store() {
        let io = io::Error::new(io::ErrorKind::NotFound, "missing.vsdoc");
        let err = AssemblyError::from(StoreError::from(io));
        assert!(matches!(err, AssemblyError::Store(StoreError::Io(_))));
        assert!(err.to_string().contains("missing.vsdoc"));
    }
}
