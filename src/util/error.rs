//! Error types for scene archive access and evaluation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the scene reader.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Scene document could not be parsed
    #[error("Invalid scene document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid data structure in the archive
    #[error("Invalid archive structure: {0}")]
    InvalidStructure(String),

    /// Sample does not match the schema of its object
    #[error("Invalid sample for {object}: {reason}")]
    InvalidSample { object: String, reason: String },

    /// Sample index out of bounds
    #[error("Sample index {index} out of bounds (count: {count})")]
    SampleOutOfBounds { index: usize, count: usize },

    /// No archive is open
    #[error("No archive is open")]
    NotOpen,

    /// Node not found by name or index
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Typed extraction requested against a node of another kind
    #[error("Kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: String, actual: String },

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an invalid sample error for the given object.
    pub fn invalid_sample(object: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSample {
            object: object.into(),
            reason: reason.into(),
        }
    }

    /// Create a kind mismatch error.
    pub fn kind_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::KindMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::SampleOutOfBounds { index: 5, count: 3 };
        assert!(e.to_string().contains("5"));
        assert!(e.to_string().contains("3"));

        let e = Error::kind_mismatch("PolyMesh", "Points");
        assert_eq!(e.to_string(), "Kind mismatch: expected PolyMesh, got Points");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
