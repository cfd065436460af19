//! Application constants for the weather ingest pipeline
//!
//! This module contains the static lookup tables (field mapping, default
//! units, conversion factors) and the file/collection names used
//! throughout the crate.

// =============================================================================
// Source Field Mapping
// =============================================================================

/// Source field name to canonical field name.
///
/// Shared by every normalizer. Fields absent from this table keep their
/// source name.
pub const FIELD_MAPPING: &[(&str, &str)] = &[
    ("temperature", fields::TEMPERATURE),
    ("point_de_rosee", fields::DEW_POINT),
    ("humidite", fields::HUMIDITY),
    ("pression", fields::PRESSURE),
    ("vent_moyen", fields::SPEED),
    ("vent_rafales", fields::GUST),
    ("vent_direction", fields::WIND),
    ("visibilite", fields::VISIBILITY),
    ("pluie_1h", fields::PRECIP_RATE),
    ("pluie_3h", fields::PRECIP_ACCUM),
    ("UV", fields::UV),
    ("Solar", fields::SOLAR),
    ("nebulosite", fields::CLOUD_COVER),
    ("temps_omm", fields::WEATHER_CODE),
    ("dh_utc", fields::TIME),
    ("station_id", fields::STATION_ID),
];

/// Resolve a source field name to its canonical name
pub fn canonical_field_name(source: &str) -> &str {
    FIELD_MAPPING
        .iter()
        .find(|(from, _)| *from == source)
        .map(|(_, to)| *to)
        .unwrap_or(source)
}

/// Canonical field names
pub mod fields {
    pub const TEMPERATURE: &str = "Temperature";
    pub const DEW_POINT: &str = "Dew Point";
    pub const HUMIDITY: &str = "Humidity";
    pub const PRESSURE: &str = "Pressure";
    pub const SPEED: &str = "Speed";
    pub const GUST: &str = "Gust";
    pub const WIND: &str = "Wind";
    pub const VISIBILITY: &str = "Visibility";
    pub const PRECIP_RATE: &str = "Precip. Rate.";
    pub const PRECIP_ACCUM: &str = "Precip. Accum.";
    pub const UV: &str = "UV";
    pub const SOLAR: &str = "Solar";
    pub const CLOUD_COVER: &str = "Cloud Cover";
    pub const WEATHER_CODE: &str = "Weather Code";
    pub const TIME: &str = "Time";
    pub const STATION_ID: &str = "station_id";
    pub const DH_UTC: &str = "dh_utc";
    pub const VENT_DIRECTION: &str = "vent_direction";
    pub const VENT_DIRECTION_ORIGINAL: &str = "vent_direction_original";
}

// =============================================================================
// Units
// =============================================================================

/// Unit labels, as detected in source text or emitted after conversion
pub mod units {
    pub const FAHRENHEIT: &str = "°F";
    pub const CELSIUS: &str = "degC";
    pub const INCH: &str = "in";
    pub const HECTOPASCAL: &str = "hPa";
    pub const MPH: &str = "mph";
    pub const KMH: &str = "km/h";
    pub const MILLIMETRE: &str = "mm";
    pub const PERCENT: &str = "%";
    pub const WATTS_PER_SQUARE_METRE: &str = "w/m²";
}

/// Units filled in by the hourly normalizer when the text carries none
pub const DEFAULT_UNITS: &[(&str, &str)] = &[
    (fields::TEMPERATURE, units::CELSIUS),
    (fields::DEW_POINT, units::CELSIUS),
    (fields::PRESSURE, units::HECTOPASCAL),
    (fields::SPEED, units::KMH),
    (fields::GUST, units::KMH),
    (fields::PRECIP_RATE, units::MILLIMETRE),
    (fields::PRECIP_ACCUM, units::MILLIMETRE),
    (fields::HUMIDITY, units::PERCENT),
    (fields::SOLAR, units::WATTS_PER_SQUARE_METRE),
];

/// Look up the default unit of a canonical field
pub fn default_unit(canonical: &str) -> Option<&'static str> {
    DEFAULT_UNITS
        .iter()
        .find(|(field, _)| *field == canonical)
        .map(|(_, unit)| *unit)
}

/// Inches of mercury to hectopascals
pub const INHG_TO_HPA: f64 = 33.8639;

/// Miles per hour to kilometres per hour
pub const MPH_TO_KMH: f64 = 1.60934;

/// Inches to millimetres
pub const INCH_TO_MM: f64 = 25.4;

// =============================================================================
// Source Files
// =============================================================================

/// Column holding the JSON payload of each exported row
pub const PAYLOAD_COLUMN: &str = "_airbyte_data";

/// Default pattern for source object names
pub const SOURCE_FILE_PATTERN: &str = "*.csv";

/// Key markers identifying each source feed
pub mod feed_markers {
    pub const STATIONS_METEOROLOGIQUES: &str = "StationsMeteorologiques";
    pub const WEATHER_BE: &str = "WeatherBE";
    pub const WEATHER_FR: &str = "WeatherFR";
}

/// Payload keys of the multi-station hourly feed
pub mod payload_keys {
    pub const STATIONS: &str = "stations";
    pub const HOURLY: &str = "hourly";
}

// =============================================================================
// Output Collections
// =============================================================================

/// Weather document collection file
pub const WEATHER_COLLECTION_FILE: &str = "weather.jsonl";

/// Station document collection file
pub const STATIONS_COLLECTION_FILE: &str = "stations.jsonl";

/// Directory under the user data dir used when no output is given
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "weatherhub";

// =============================================================================
// Quality Thresholds
// =============================================================================

/// Error rate (percent) below which data quality is excellent
pub const QUALITY_EXCELLENT_BELOW: f64 = 5.0;

/// Error rate (percent) below which data quality is acceptable
pub const QUALITY_ACCEPTABLE_BELOW: f64 = 15.0;

/// Number of critical fields checked per weather document
pub const CRITICAL_FIELD_COUNT: usize = 5;
