//! Source discovery for export buckets
//!
//! The bucket is a local directory mirroring the object store layout.
//! Every matching file becomes a [`SourceObject`] keyed by its
//! `/`-separated path relative to the bucket root.

use crate::error::{IngestError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One export file in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceObject {
    /// Object key, e.g. `airbyte/WeatherBE/2024_10_01.csv`
    pub key: String,
    pub path: PathBuf,
}

/// File discovery component for export buckets
#[derive(Debug, Clone)]
pub struct SourceDiscovery {
    root: PathBuf,
    pattern: Pattern,
}

impl SourceDiscovery {
    /// Create a discovery over `root` keeping file names matching `pattern`
    pub fn new(root: PathBuf, pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            IngestError::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { root, pattern })
    }

    /// List every matching file below the root, sorted by key
    ///
    /// ```text
    /// bucket/
    ///   airbyte/
    ///     StationsMeteorologiques/
    ///       2024_10_01.csv
    ///     WeatherBE/
    ///       2024_10_01.csv
    /// ```
    pub fn discover(&self) -> Result<Vec<SourceObject>> {
        if !self.root.is_dir() {
            return Err(IngestError::SourceNotFound {
                path: self.root.clone(),
            });
        }

        debug!("Searching for source files in: {}", self.root.display());

        let mut objects = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| IngestError::ProcessingFailed {
                path: self.root.clone(),
                reason: format!("Failed to walk directory: {}", e),
            })?;

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            if let Some(key) = object_key(&self.root, entry.path()) {
                objects.push(SourceObject {
                    key,
                    path: entry.path().to_path_buf(),
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        debug!("Found {} source files", objects.len());

        Ok(objects)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.pattern.matches(name))
    }
}

/// Key of `path` relative to `root`, with `/` separators
fn object_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
