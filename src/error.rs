//! Error handling for weather ingest operations.
//!
//! Provides error types with context for source discovery, payload
//! decoding and sink failures. Value-level parse problems are never errors:
//! they surface as absent measurements instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source directory not found at path: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Missing payload column '{column}' in file: {key}")]
    MissingPayloadColumn { key: String, column: String },

    #[error("Unrecognized source file: {key}")]
    UnrecognizedSource { key: String },

    #[error("Malformed row {row} in {key}: {reason}")]
    MalformedRow {
        key: String,
        row: usize,
        reason: String,
    },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl IngestError {
    /// Create a malformed row error
    pub fn malformed_row(key: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            key: key.into(),
            row,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error only skips the current file rather than failing it
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            IngestError::MissingPayloadColumn { .. } | IngestError::UnrecognizedSource { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_classification() {
        let missing = IngestError::MissingPayloadColumn {
            key: "WeatherBE/2024.csv".to_string(),
            column: "_airbyte_data".to_string(),
        };
        assert!(missing.is_skip());

        let unknown = IngestError::UnrecognizedSource {
            key: "misc/other.csv".to_string(),
        };
        assert!(unknown.is_skip());

        let row = IngestError::malformed_row("WeatherFR/a.csv", 3, "expected value");
        assert!(!row.is_skip());
        assert_eq!(
            row.to_string(),
            "Malformed row 3 in WeatherFR/a.csv: expected value"
        );
    }
}
