//! Error types for ecogenesis_io.
//!
//! Structured error handling for snapshot persistence and event logging.

use thiserror::Error;

/// Main error type for ecogenesis_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression errors
    #[error("Compression error: {0}")]
    Compression(String),

    /// Snapshot validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for ecogenesis_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }
}
