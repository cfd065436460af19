//! Station profiles and registration.
//!
//! Single-station feeds do not describe their station in the payload; their
//! profile is known ahead of time and registered once per id. The hourly
//! feed ships its own station objects, which are stored as received.

use crate::error::Result;
use crate::models::SourceFeed;
use crate::processor::writer::DocumentSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Known description of a single-station source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: u32,
    pub city: &'static str,
    pub state: &'static str,
    pub hardware: &'static str,
    pub software: &'static str,
    #[serde(rename = "type")]
    pub station_type: &'static str,
    pub license: StationLicense,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationLicense {
    pub source: &'static str,
}

pub const WEATHER_UNDERGROUND: &str = "weather_underground";

pub const LA_MADELEINE: StationProfile = StationProfile {
    id: "ILAMAD25",
    name: "La Madeleine",
    latitude: 50.659,
    longitude: 3.07,
    elevation: 23,
    city: "La Madeleine",
    state: "-/-",
    hardware: "other",
    software: "EasyWeatherPro_V5.1.6",
    station_type: WEATHER_UNDERGROUND,
    license: StationLicense {
        source: "Weather Underground",
    },
};

pub const ICHTEGEM: StationProfile = StationProfile {
    id: "IICHTE19",
    name: "WeerstationBS",
    latitude: 51.092,
    longitude: 2.999,
    elevation: 15,
    city: "Ichtegem",
    state: "-/-",
    hardware: "other",
    software: "EasyWeatherV1.6.6",
    station_type: WEATHER_UNDERGROUND,
    license: StationLicense {
        source: "Weather Underground",
    },
};

/// Station profile backing a single-station feed
pub fn profile_for(feed: SourceFeed) -> Option<&'static StationProfile> {
    match feed {
        SourceFeed::WeatherFr => Some(&LA_MADELEINE),
        SourceFeed::WeatherBe => Some(&ICHTEGEM),
        SourceFeed::StationsMeteorologiques => None,
    }
}

/// Station document as stored in the stations collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDocument {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub source_file: String,
    pub created_at: DateTime<Utc>,
}

impl StationDocument {
    /// Station object received in a payload
    pub fn from_payload(mut fields: Map<String, Value>, source_file: &str) -> Self {
        fields.remove("source_file");
        fields.remove("created_at");
        Self {
            fields,
            source_file: source_file.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn from_profile(profile: &StationProfile, source_file: &str) -> Result<Self> {
        let fields = match serde_json::to_value(profile)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self::from_payload(fields, source_file))
    }

    /// Station identifier, when the document carries one
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }
}

/// Registers single-station profiles, at most once per id
#[derive(Debug, Default)]
pub struct StationRegistry;

impl StationRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Insert the profile unless the sink already holds its id.
    ///
    /// Returns the station id and whether a document was written.
    pub fn ensure_station(
        &self,
        profile: &StationProfile,
        source_file: &str,
        sink: &mut dyn DocumentSink,
    ) -> Result<(String, bool)> {
        if sink.contains_station(profile.id) {
            info!("Station {} ({}) already exists", profile.name, profile.id);
            return Ok((profile.id.to_string(), false));
        }

        let document = StationDocument::from_profile(profile, source_file)?;
        sink.insert_station(&document)?;
        info!("Station {} ({}) created", profile.name, profile.id);
        Ok((profile.id.to_string(), true))
    }
}
