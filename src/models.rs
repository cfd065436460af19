//! Core data structures and types for weather ingest.
//!
//! Defines source feed classification, the measurement triple, the
//! canonical observation record and run statistics.

use crate::constants::feed_markers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw observation as decoded from a payload: source field name to raw value
pub type RawRecord = serde_json::Map<String, Value>;

/// Shape of the raw records a normalizer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Hourly multi-station feed, values already metric but units sometimes missing
    MultiStationHourly,
    /// Single-station feeds emitting US-customary units inside the text
    SingleStationImperial,
}

/// Source feeds recognised in the export bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFeed {
    StationsMeteorologiques,
    WeatherBe,
    WeatherFr,
}

impl SourceFeed {
    /// Detect the feed from an object key.
    ///
    /// This is the only place object keys are inspected; everything
    /// downstream works from the returned tag.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.contains(feed_markers::STATIONS_METEOROLOGIQUES) {
            Some(SourceFeed::StationsMeteorologiques)
        } else if key.contains(feed_markers::WEATHER_BE) {
            Some(SourceFeed::WeatherBe)
        } else if key.contains(feed_markers::WEATHER_FR) {
            Some(SourceFeed::WeatherFr)
        } else {
            None
        }
    }

    /// Record shape emitted by this feed
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceFeed::StationsMeteorologiques => SourceKind::MultiStationHourly,
            SourceFeed::WeatherBe | SourceFeed::WeatherFr => SourceKind::SingleStationImperial,
        }
    }

    /// Marker name of the feed
    pub fn name(&self) -> &'static str {
        match self {
            SourceFeed::StationsMeteorologiques => feed_markers::STATIONS_METEOROLOGIQUES,
            SourceFeed::WeatherBe => feed_markers::WEATHER_BE,
            SourceFeed::WeatherFr => feed_markers::WEATHER_FR,
        }
    }
}

/// Parsed `(value, unit, original)` triple of one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub original: Option<String>,
}

impl Measurement {
    pub fn new(value: Option<f64>, unit: Option<String>, original: Option<String>) -> Self {
        Self {
            value,
            unit,
            original,
        }
    }
}

/// Value-only field such as the UV index or solar radiation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// One entry of a canonical record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalField {
    Measurement(Measurement),
    Scalar(Scalar),
    /// Copied verbatim from the raw record (timestamps, identifiers, direction text)
    Raw(Value),
}

/// Fully mapped and converted output of one raw record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    fields: BTreeMap<String, CanonicalField>,
}

impl CanonicalRecord {
    pub(crate) fn from_fields(fields: BTreeMap<String, CanonicalField>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalField> {
        self.fields.get(name)
    }

    /// Measurement stored under `name`, if that field is a measurement
    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        match self.fields.get(name) {
            Some(CanonicalField::Measurement(m)) => Some(m),
            _ => None,
        }
    }

    pub fn scalar(&self, name: &str) -> Option<&Scalar> {
        match self.fields.get(name) {
            Some(CanonicalField::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(CanonicalField::Raw(v)) => Some(v),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record with `station_id` set to `station_id`
    pub fn with_station_id(&self, station_id: &str) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(
            crate::constants::fields::STATION_ID.to_string(),
            CanonicalField::Raw(Value::String(station_id.to_string())),
        );
        Self { fields }
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub stations_written: usize,
    pub documents_written: usize,
    pub processing_time_ms: u128,
}
