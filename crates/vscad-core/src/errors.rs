//! Error types for the vscad model layer.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while parsing or decoding model data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Missing field '{field}' in {entity}")]
    MissingField { entity: &'static str, field: String },

    #[error("Invalid type for '{field}': expected {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid shape: {0}")]
    UnknownShape(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid unique name '{name}': {reason}")]
    InvalidUniqueName { name: String, reason: String },
}

impl ModelError {
    pub fn missing(entity: &'static str, field: impl Into<String>) -> Self {
        Self::MissingField {
            entity,
            field: field.into(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }
}
