//! Command-line argument definitions for the weather ingest tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{IngestConfig, default_output_dir};
use crate::constants::{PAYLOAD_COLUMN, SOURCE_FILE_PATTERN};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the weather ingest tool
///
/// Imports exported weather observation files into normalized weather and
/// station collections, then reports on their quality.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weatherhub-ingest",
    version,
    about = "Normalize exported weather station observations into canonical documents",
    long_about = "Reads CSV exports of weather feeds (a multi-station hourly feed and \
                  Weather Underground station feeds), normalizes every observation to \
                  metric units and a canonical field set, and writes weather and station \
                  documents as JSON Lines collections."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import an export bucket into the collections (main command)
    Import(ImportArgs),
    /// Print the data-quality report of existing collections
    Report(ReportArgs),
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable summary
    Human,
    /// JSON for machine consumption
    Json,
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Bucket directory holding the exported CSV files
    ///
    /// Files are classified by the feed name found in their path
    /// (StationsMeteorologiques, WeatherBE, WeatherFR).
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving weather.jsonl and stations.jsonl
    ///
    /// Defaults to the user data directory (e.g. ~/.local/share/weatherhub).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name glob selecting export files
    #[arg(long = "pattern", default_value = SOURCE_FILE_PATTERN)]
    pub file_pattern: String,

    /// CSV column carrying the JSON payload
    #[arg(long = "payload-column", default_value = PAYLOAD_COLUMN)]
    pub payload_column: String,

    /// Append to the existing collections instead of clearing them first
    #[arg(long = "keep-existing")]
    pub keep_existing: bool,

    /// Number of files read concurrently (defaults to the CPU count)
    #[arg(short = 'j', long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Skip the data-quality report after the import
    #[arg(long = "no-quality-report")]
    pub no_quality_report: bool,

    /// Output format for the summary and report
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Directory holding weather.jsonl and stations.jsonl
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format for the report
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ImportArgs {
    /// Build the import configuration from the arguments
    pub fn to_config(&self) -> IngestConfig {
        let mut config = IngestConfig::new(self.input_dir.clone())
            .with_output_dir(self.output_dir.clone().unwrap_or_else(default_output_dir))
            .with_file_pattern(self.file_pattern.clone())
            .with_payload_column(self.payload_column.clone());

        if self.keep_existing {
            config = config.with_keep_existing();
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_max_concurrent_files(concurrency);
        }
        if self.no_quality_report {
            config = config.without_quality_report();
        }
        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl ReportArgs {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
