//! Configuration management and validation.
//!
//! Import settings with defaults matching the export bucket layout. The
//! binary builds an [`IngestConfig`] from its arguments; library users can
//! start from `Default` and adjust with the `with_*` methods.

use crate::constants::{DEFAULT_OUTPUT_DIR_NAME, PAYLOAD_COLUMN, SOURCE_FILE_PATTERN};
use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Global configuration for an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Local bucket directory holding the exported CSV files
    pub input_dir: PathBuf,

    /// Directory receiving the weather and station collections
    pub output_dir: PathBuf,

    /// File name glob selecting export files
    pub file_pattern: String,

    /// CSV column carrying the JSON payload
    pub payload_column: String,

    /// Empty both collections before importing
    pub clear_before_import: bool,

    /// Maximum number of files read and normalized at once
    pub max_concurrent_files: usize,

    /// Print the data-quality report after the import
    pub quality_report: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: default_output_dir(),
            file_pattern: SOURCE_FILE_PATTERN.to_string(),
            payload_column: PAYLOAD_COLUMN.to_string(),
            clear_before_import: true,
            max_concurrent_files: num_cpus::get(),
            quality_report: true,
        }
    }
}

impl IngestConfig {
    /// Configuration reading from `input_dir` with every other setting at its default
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_payload_column(mut self, column: impl Into<String>) -> Self {
        self.payload_column = column.into();
        self
    }

    /// Append to the existing collections instead of clearing them
    pub fn with_keep_existing(mut self) -> Self {
        self.clear_before_import = false;
        self
    }

    /// Set maximum concurrent files
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn without_quality_report(mut self) -> Self {
        self.quality_report = false;
        self
    }

    /// Check the settings for consistency before a run
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.exists() {
            return Err(IngestError::configuration(format!(
                "Input path does not exist: {}",
                self.input_dir.display()
            )));
        }

        if !self.input_dir.is_dir() {
            return Err(IngestError::configuration(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }

        if self.output_dir.is_file() {
            return Err(IngestError::configuration(format!(
                "Output path is a file: {}",
                self.output_dir.display()
            )));
        }

        if self.file_pattern.trim().is_empty() {
            return Err(IngestError::configuration("File pattern cannot be empty"));
        }

        if self.payload_column.trim().is_empty() {
            return Err(IngestError::configuration("Payload column cannot be empty"));
        }

        if self.max_concurrent_files == 0 {
            return Err(IngestError::configuration(
                "Number of concurrent files must be greater than 0",
            ));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Default collection directory under the user data directory
pub fn default_output_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_OUTPUT_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.file_pattern, "*.csv");
        assert_eq!(config.payload_column, "_airbyte_data");
        assert!(config.clear_before_import);
        assert!(config.quality_report);
        assert!(config.max_concurrent_files >= 1);
        assert!(config.output_dir.ends_with("weatherhub"));
    }

    #[test]
    fn test_builders() {
        let config = IngestConfig::new(PathBuf::from("/data/bucket"))
            .with_output_dir(PathBuf::from("/tmp/out"))
            .with_file_pattern("2024_*.csv")
            .with_payload_column("payload")
            .with_keep_existing()
            .with_max_concurrent_files(2)
            .without_quality_report();

        assert_eq!(config.input_dir, PathBuf::from("/data/bucket"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.file_pattern, "2024_*.csv");
        assert_eq!(config.payload_column, "payload");
        assert!(!config.clear_before_import);
        assert_eq!(config.max_concurrent_files, 2);
        assert!(!config.quality_report);
    }

    #[test]
    fn test_validate() {
        let temp_dir = TempDir::new().unwrap();
        let config = IngestConfig::new(temp_dir.path().to_path_buf())
            .with_output_dir(temp_dir.path().join("out"));
        assert!(config.validate().is_ok());

        let missing = IngestConfig {
            input_dir: temp_dir.path().join("missing"),
            ..config.clone()
        };
        assert!(matches!(
            missing.validate(),
            Err(IngestError::Configuration { .. })
        ));

        let zero = config.clone().with_max_concurrent_files(0);
        assert!(zero.validate().is_err());

        let empty_column = config.with_payload_column(" ");
        assert!(empty_column.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = IngestConfig::new(PathBuf::from("bucket")).with_keep_existing();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: IngestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.input_dir, config.input_dir);
        assert!(!parsed.clear_before_import);
    }
}
