//! Import engine.
//!
//! Orchestrates a complete import run: discovery of export files,
//! concurrent reading and normalization per file, then sequential writes to
//! the document sink in key order.

pub mod discovery;
pub mod feeds;
pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::SourceDiscovery,
    feeds::{FileImport, import_file},
    writer::DocumentSink,
};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::models::IngestStats;
use crate::station::StationRegistry;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::pin::pin;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Imports a bucket of export files into a document sink
#[derive(Debug)]
pub struct Importer {
    config: IngestConfig,
    discovery: SourceDiscovery,
    registry: StationRegistry,
    show_progress: bool,
}

impl Importer {
    /// Create an importer for a validated configuration
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        let discovery = SourceDiscovery::new(config.input_dir.clone(), &config.file_pattern)?;

        Ok(Self {
            config,
            discovery,
            registry: StationRegistry::new(),
            show_progress: false,
        })
    }

    /// Display a progress bar while files are imported
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Main import entry point
    pub async fn run(&self, sink: &mut dyn DocumentSink) -> Result<IngestStats> {
        let start_time = Instant::now();
        let mut stats = IngestStats::default();

        let discovery = self.discovery.clone();
        let objects = task::spawn_blocking(move || discovery.discover())
            .await
            .map_err(|e| IngestError::ProcessingFailed {
                path: self.config.input_dir.clone(),
                reason: format!("Discovery task failed: {}", e),
            })??;
        stats.files_discovered = objects.len();
        info!("Found {} source files", objects.len());

        if self.config.clear_before_import {
            sink.clear()?;
            info!("Cleared existing collections");
        }

        let pb = self.progress_bar(objects.len() as u64);
        let payload_column = self.config.payload_column.clone();

        // Files are read concurrently; results come back in key order
        let mut imports = pin!(
            stream::iter(objects)
                .map(|object| {
                    let payload_column = payload_column.clone();
                    task::spawn_blocking(move || {
                        let result = import_file(&object, &payload_column);
                        (object, result)
                    })
                })
                .buffered(self.config.max_concurrent_files.max(1))
        );

        while let Some(joined) = imports.next().await {
            pb.inc(1);

            let (object, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Import task failed: {}", e);
                    stats.files_failed += 1;
                    continue;
                }
            };
            pb.set_message(object.key.clone());

            match result {
                Ok(import) => self.write_import(&import, sink, &mut stats)?,
                Err(e) if e.is_skip() => {
                    warn!("Skipping {}: {}", object.key, e);
                    stats.files_skipped += 1;
                }
                Err(e) => {
                    error!("Failed to import {}: {}", object.key, e);
                    stats.files_failed += 1;
                }
            }
        }

        sink.flush()?;
        pb.finish_with_message("Import complete");

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Imported {} documents and {} stations from {} files in {}ms",
            stats.documents_written,
            stats.stations_written,
            stats.files_processed,
            stats.processing_time_ms
        );

        Ok(stats)
    }

    fn write_import(
        &self,
        import: &FileImport,
        sink: &mut dyn DocumentSink,
        stats: &mut IngestStats,
    ) -> Result<()> {
        if let Some(profile) = import.profile {
            let (_, created) = self.registry.ensure_station(profile, &import.key, sink)?;
            if created {
                stats.stations_written += 1;
            }
        }

        for station in &import.stations {
            sink.insert_station(station)?;
        }
        for document in &import.documents {
            sink.insert_weather(document)?;
        }

        stats.stations_written += import.stations.len();
        stats.documents_written += import.documents.len();
        stats.rows_processed += import.rows_processed;
        stats.rows_failed += import.rows_failed;
        stats.files_processed += 1;

        debug!(
            "{} ({}): {} documents inserted",
            import.key,
            import.feed.name(),
            import.documents.len()
        );
        Ok(())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Importing files");
        pb
    }
}
