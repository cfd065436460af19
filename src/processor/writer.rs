//! Document sinks for the weather and station collections
//!
//! The datastore is an external collaborator; the pipeline only needs
//! insert, existence check by station id, and clearing. Two sinks are
//! provided: JSON Lines files on disk and an in-memory collection.

use crate::constants::{STATIONS_COLLECTION_FILE, WEATHER_COLLECTION_FILE};
use crate::document::WeatherDocument;
use crate::error::Result;
use crate::station::StationDocument;

use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Destination of canonical documents
pub trait DocumentSink: Send {
    fn insert_weather(&mut self, document: &WeatherDocument) -> Result<()>;

    fn insert_station(&mut self, document: &StationDocument) -> Result<()>;

    /// Whether a station with this id has been stored
    fn contains_station(&self, id: &str) -> bool;

    /// Remove every stored station and weather document
    fn clear(&mut self) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink writing one JSON document per line
#[derive(Debug)]
pub struct JsonLinesSink {
    output_dir: PathBuf,
    weather: BufWriter<File>,
    stations: BufWriter<File>,
    station_ids: HashSet<String>,
}

impl JsonLinesSink {
    /// Open (or create) the collections in `output_dir`, appending to existing content
    pub fn open(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)?;

        let stations_path = output_dir.join(STATIONS_COLLECTION_FILE);
        let station_ids = load_station_ids(&stations_path)?;
        debug!(
            "Opened collections in {} ({} known stations)",
            output_dir.display(),
            station_ids.len()
        );

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            weather: open_append(&output_dir.join(WEATHER_COLLECTION_FILE))?,
            stations: open_append(&stations_path)?,
            station_ids,
        })
    }

    pub fn weather_path(&self) -> PathBuf {
        self.output_dir.join(WEATHER_COLLECTION_FILE)
    }

    pub fn stations_path(&self) -> PathBuf {
        self.output_dir.join(STATIONS_COLLECTION_FILE)
    }
}

impl DocumentSink for JsonLinesSink {
    fn insert_weather(&mut self, document: &WeatherDocument) -> Result<()> {
        write_line(&mut self.weather, document)
    }

    fn insert_station(&mut self, document: &StationDocument) -> Result<()> {
        write_line(&mut self.stations, document)?;
        if let Some(id) = document.id() {
            self.station_ids.insert(id.to_string());
        }
        Ok(())
    }

    fn contains_station(&self, id: &str) -> bool {
        self.station_ids.contains(id)
    }

    fn clear(&mut self) -> Result<()> {
        // Pending writes must land before truncation
        self.flush()?;
        self.weather = BufWriter::new(File::create(self.weather_path())?);
        self.stations = BufWriter::new(File::create(self.stations_path())?);
        self.station_ids.clear();
        debug!("Cleared collections in {}", self.output_dir.display());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.weather.flush()?;
        self.stations.flush()?;
        Ok(())
    }
}

/// In-memory collections
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub weather: Vec<WeatherDocument>,
    pub stations: Vec<StationDocument>,
}

impl DocumentSink for MemorySink {
    fn insert_weather(&mut self, document: &WeatherDocument) -> Result<()> {
        self.weather.push(document.clone());
        Ok(())
    }

    fn insert_station(&mut self, document: &StationDocument) -> Result<()> {
        self.stations.push(document.clone());
        Ok(())
    }

    fn contains_station(&self, id: &str) -> bool {
        self.stations.iter().any(|s| s.id() == Some(id))
    }

    fn clear(&mut self) -> Result<()> {
        self.weather.clear();
        self.stations.clear();
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<BufWriter<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

fn write_line<T: Serialize>(writer: &mut BufWriter<File>, document: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, document)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Collect the `id` of every station already stored at `path`
fn load_station_ids(path: &Path) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    if !path.exists() {
        return Ok(ids);
    }

    let reader = BufReader::new(File::open(path)?);
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(&line) {
            Ok(value) => {
                if let Some(id) = value.get("id").and_then(|v| v.as_str()) {
                    ids.insert(id.to_string());
                }
            }
            Err(e) => warn!(
                "Ignoring unreadable station line {} in {}: {}",
                line_num + 1,
                path.display(),
                e
            ),
        }
    }

    Ok(ids)
}
