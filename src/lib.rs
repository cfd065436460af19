//! WeatherHub Ingest Library
//!
//! A Rust library for normalizing weather-station observations from
//! heterogeneous feeds into one canonical document schema.
//!
//! This library provides tools for:
//! - Parsing raw field values such as `"60.3 °F"` into value, unit and original text
//! - Normalizing multi-station hourly records and imperial single-station records
//! - Converting imperial units (°F, inHg, mph, in) to metric, gated on the detected unit
//! - Building canonical weather documents with provenance metadata
//! - Importing CSV export buckets into JSON Lines collections
//! - Reporting on the quality of the stored collections
//!
//! ```
//! use serde_json::json;
//! use weatherhub_ingest::{SourceKind, build_document, normalizer_for};
//!
//! let raw = json!({"Temperature": "60.3 °F", "Pressure": "29.49 in"});
//! let record = normalizer_for(SourceKind::SingleStationImperial)
//!     .normalize(raw.as_object().unwrap());
//! let doc = build_document(
//!     &record,
//!     "WeatherBE/2024_10_01.csv",
//!     Some(0),
//!     None,
//!     Some("IICHTE19"),
//! );
//!
//! let temperature = doc.measurements.temperature.unwrap();
//! assert_eq!(temperature.unit.as_deref(), Some("degC"));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod parser;
pub mod processor;
pub mod quality;
pub mod station;

// Re-export commonly used types
pub use config::IngestConfig;
pub use document::{WeatherDocument, build_document};
pub use error::{IngestError, Result};
pub use models::{
    CanonicalField, CanonicalRecord, IngestStats, Measurement, RawRecord, SourceFeed, SourceKind,
};
pub use normalizer::{RecordNormalizer, normalizer_for};
pub use parser::parse_value;
pub use processor::Importer;
pub use quality::QualityReport;
