//! Data-quality report over the stored collections.
//!
//! A field counts as missing when it is absent, null or an empty string.
//! The global error rate is the share of missing critical weather fields
//! over all checked fields.

use crate::constants::{
    CRITICAL_FIELD_COUNT, QUALITY_ACCEPTABLE_BELOW, QUALITY_EXCELLENT_BELOW,
    STATIONS_COLLECTION_FILE, WEATHER_COLLECTION_FILE,
};
use crate::error::Result;
use crate::station::WEATHER_UNDERGROUND;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Overall verdict derived from the error rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityRating {
    Excellent,
    Acceptable,
    NeedsImprovement,
}

impl QualityRating {
    pub fn from_error_rate(error_rate: f64) -> Self {
        if error_rate < QUALITY_EXCELLENT_BELOW {
            QualityRating::Excellent
        } else if error_rate < QUALITY_ACCEPTABLE_BELOW {
            QualityRating::Acceptable
        } else {
            QualityRating::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "Excellent data quality",
            QualityRating::Acceptable => "Acceptable data quality",
            QualityRating::NeedsImprovement => "Data quality needs improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTypeCount {
    /// `None` for stations without a type
    pub station_type: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationListing {
    pub id: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationGaps {
    pub without_id: usize,
    pub without_name: usize,
    pub without_coordinates: usize,
}

/// Weather documents missing each critical field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherGaps {
    pub without_station_id: usize,
    pub without_dh_utc: usize,
    pub without_temperature: usize,
    pub without_pressure: usize,
    pub without_humidity: usize,
}

impl WeatherGaps {
    pub fn total(&self) -> usize {
        self.without_station_id
            + self.without_dh_utc
            + self.without_temperature
            + self.without_pressure
            + self.without_humidity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceCount {
    pub source_file: Option<String>,
    /// Last path segment of the source file
    pub file_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationLeader {
    pub station_id: Option<String>,
    /// Name from the stations collection, when the station is known there
    pub name: Option<String>,
    pub total: f64,
}

/// Quality figures for one pair of collections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub total_stations: usize,
    pub total_weather: usize,
    pub station_types: Vec<StationTypeCount>,
    pub weather_underground_stations: Vec<StationListing>,
    pub station_gaps: StationGaps,
    pub weather_gaps: WeatherGaps,
    pub per_source: Vec<SourceCount>,
    pub error_rate: f64,
    pub rating: QualityRating,
    pub top_precipitation: Option<PrecipitationLeader>,
}

impl QualityReport {
    /// Build the report from station and weather documents
    pub fn from_documents(stations: &[Value], weather: &[Value]) -> Self {
        let weather_gaps = weather_gaps(weather);
        let error_rate = error_rate(&weather_gaps, weather.len());

        Self {
            total_stations: stations.len(),
            total_weather: weather.len(),
            station_types: station_types(stations),
            weather_underground_stations: weather_underground_stations(stations),
            station_gaps: station_gaps(stations),
            weather_gaps,
            per_source: per_source(weather),
            error_rate,
            rating: QualityRating::from_error_rate(error_rate),
            top_precipitation: top_precipitation(stations, weather),
        }
    }

    /// Build the report from the JSON Lines collections in `output_dir`
    pub fn from_output_dir(output_dir: &Path) -> Result<Self> {
        let stations = read_collection(&output_dir.join(STATIONS_COLLECTION_FILE))?;
        let weather = read_collection(&output_dir.join(WEATHER_COLLECTION_FILE))?;
        debug!(
            "Loaded {} stations and {} weather documents for quality report",
            stations.len(),
            weather.len()
        );
        Ok(Self::from_documents(&stations, &weather))
    }
}

/// Percentage of `count` in `total`, 0 for an empty total
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn text(document: &Value, key: &str) -> Option<String> {
    match document.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn station_types(stations: &[Value]) -> Vec<StationTypeCount> {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for station in stations {
        *counts.entry(text(station, "type")).or_default() += 1;
    }

    let mut types: Vec<StationTypeCount> = counts
        .into_iter()
        .map(|(station_type, count)| StationTypeCount {
            station_type,
            count,
        })
        .collect();
    types.sort_by(|a, b| b.count.cmp(&a.count));
    types
}

fn weather_underground_stations(stations: &[Value]) -> Vec<StationListing> {
    stations
        .iter()
        .filter(|s| s.get("type").and_then(Value::as_str) == Some(WEATHER_UNDERGROUND))
        .map(|s| StationListing {
            id: text(s, "id"),
            name: text(s, "name"),
            city: text(s, "city"),
        })
        .collect()
}

fn station_gaps(stations: &[Value]) -> StationGaps {
    let mut gaps = StationGaps::default();
    for station in stations {
        if is_missing(station.get("id")) {
            gaps.without_id += 1;
        }
        if is_missing(station.get("name")) {
            gaps.without_name += 1;
        }
        if is_missing(station.get("latitude")) || is_missing(station.get("longitude")) {
            gaps.without_coordinates += 1;
        }
    }
    gaps
}

fn weather_gaps(weather: &[Value]) -> WeatherGaps {
    let mut gaps = WeatherGaps::default();
    for document in weather {
        if is_missing(document.get("station_id")) {
            gaps.without_station_id += 1;
        }
        if is_missing(document.get("dh_utc")) {
            gaps.without_dh_utc += 1;
        }
        if is_missing(document.pointer("/measurements/temperature/value")) {
            gaps.without_temperature += 1;
        }
        if is_missing(document.pointer("/measurements/pressure/value")) {
            gaps.without_pressure += 1;
        }
        if is_missing(document.pointer("/measurements/humidity/value")) {
            gaps.without_humidity += 1;
        }
    }
    gaps
}

fn error_rate(gaps: &WeatherGaps, total_weather: usize) -> f64 {
    percent(gaps.total(), total_weather * CRITICAL_FIELD_COUNT)
}

fn per_source(weather: &[Value]) -> Vec<SourceCount> {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for document in weather {
        let source = document
            .pointer("/metadata/source_file")
            .and_then(Value::as_str)
            .map(str::to_string);
        *counts.entry(source).or_default() += 1;
    }

    let mut sources: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source_file, count)| {
            let file_name = source_file
                .as_deref()
                .filter(|s| !s.is_empty())
                .and_then(|s| s.rsplit('/').next())
                .unwrap_or("Unknown")
                .to_string();
            SourceCount {
                source_file,
                file_name,
                count,
            }
        })
        .collect();
    sources.sort_by(|a, b| b.count.cmp(&a.count));
    sources
}

/// Station with the largest summed precipitation accumulation
fn top_precipitation(stations: &[Value], weather: &[Value]) -> Option<PrecipitationLeader> {
    let mut totals: BTreeMap<Option<String>, f64> = BTreeMap::new();
    for document in weather {
        let accumulation = document
            .pointer("/measurements/precipitation/accumulation")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        *totals.entry(text(document, "station_id")).or_default() += accumulation;
    }

    let mut leader: Option<(Option<String>, f64)> = None;
    for (station_id, total) in totals {
        if leader.as_ref().is_none_or(|(_, best)| total > *best) {
            leader = Some((station_id, total));
        }
    }

    leader.map(|(station_id, total)| {
        let name = station_id.as_deref().and_then(|id| {
            stations
                .iter()
                .find(|s| s.get("id").and_then(Value::as_str) == Some(id))
                .and_then(|s| text(s, "name"))
        });
        PrecipitationLeader {
            station_id,
            name,
            total,
        }
    })
}

/// Read a JSON Lines collection; a missing file is an empty collection
fn read_collection(path: &Path) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    if !path.exists() {
        return Ok(documents);
    }

    let reader = BufReader::new(File::open(path)?);
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(document) => documents.push(document),
            Err(e) => warn!(
                "Ignoring unreadable line {} in {}: {}",
                line_num + 1,
                path.display(),
                e
            ),
        }
    }

    Ok(documents)
}
