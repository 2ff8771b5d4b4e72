//! Error types for confgridlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while editing or persisting configuration tables
#[derive(Error, Debug)]
pub enum ConfgridError {
    /// Bad or missing user input; the table is left unchanged
    #[error("{0}")]
    Validation(String),

    /// Pasted data column count does not match the existing table
    #[error(
        "schema mismatch: the pasted data has {} fields per row ({actual}) than the existing table has columns ({expected})",
        if .actual > .expected { "more" } else { "fewer" }
    )]
    SchemaMismatch { expected: usize, actual: usize },

    /// Malformed pasted text
    #[error("cannot parse pasted data: {0}")]
    Parse(String),

    /// Failed to read or write the underlying storage
    #[error("storage error for '{path}': {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stored file exists but is not valid JSON
    #[error("corrupt table file '{path}': {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Stored file is valid JSON but not a table
    #[error("corrupt table file '{path}': {message}")]
    InvalidShape { path: PathBuf, message: String },
}

impl ConfgridError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        ConfgridError::Validation(message.into())
    }
}
