//! Typed errors for the engine's API boundary.
//!
//! The tick path itself is total and never returns errors; these kinds
//! cover invalid inputs handed in from outside.

use thiserror::Error;

/// Boundary error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller handed in an argument the operation cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The world configuration is unusable; the engine refuses to start.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A multi-year run was stopped at a year boundary. Not a failure.
    #[error("cancelled at year boundary")]
    Cancelled,
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    #[must_use]
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    #[must_use]
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::invalid_argument("fraction above 1");
        assert_eq!(err.to_string(), "invalid argument: fraction above 1");
    }

    #[test]
    fn test_not_found_display() {
        let err = EngineError::not_found("species 42");
        assert!(err.to_string().contains("species 42"));
    }
}
