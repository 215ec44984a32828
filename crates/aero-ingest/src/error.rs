//! Error types for tabular ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while listing or reading source files.
///
/// Extraction errors are fatal to the single file being read, never to the
/// run.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Referenced source file does not exist.
    #[error("source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is not one of the supported tabular formats.
    #[error("unsupported format '{extension}': {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The underlying parse failed (corrupt file, unknown sheet).
    #[error("malformed source {path}: {message}")]
    MalformedSource { path: PathBuf, message: String },
}

impl IngestError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedSource {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SourceNotFound {
            path: PathBuf::from("/data/input/passengers.csv"),
        };
        assert_eq!(
            err.to_string(),
            "source file not found: /data/input/passengers.csv"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = IngestError::UnsupportedFormat {
            path: PathBuf::from("flights.json"),
            extension: "json".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"unsupported format 'json': flights.json");
    }
}
