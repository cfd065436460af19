//! Canonical weather document, the stable schema handed to the sink.
//!
//! The builder projects a [`CanonicalRecord`] onto a fixed nested shape.
//! Canonical fields outside that projection (visibility, cloud cover,
//! weather code, ...) are not carried into the document.

use crate::constants::fields;
use crate::models::{CanonicalRecord, Measurement, Scalar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Weather observation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDocument {
    pub station_id: Option<String>,
    pub dh_utc: Option<Value>,
    pub measurements: Measurements,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub temperature: Option<Measurement>,
    pub dew_point: Option<Measurement>,
    pub humidity: Option<Measurement>,
    pub wind: Wind,
    pub pressure: Option<Measurement>,
    pub precipitation: Precipitation,
    pub solar_radiation: Option<Scalar>,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
    pub speed_unit: Option<String>,
    pub gust: Option<f64>,
    pub gust_unit: Option<String>,
    /// Numeric value of the canonical `Wind` measurement.
    ///
    /// Legacy documents always carried null here; text directions such as
    /// `"WSW"` still project to null and survive in `direction_original`.
    pub direction: Option<f64>,
    pub direction_original: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    pub rate: Option<f64>,
    pub accumulation: Option<f64>,
    pub unit: Option<String>,
}

/// Provenance of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source_file: String,
    pub row_index: Option<usize>,
    pub hour_index: Option<usize>,
    pub created_at: DateTime<Utc>,
}

/// Build a document stamped with the current time
pub fn build_document(
    record: &CanonicalRecord,
    source_file: &str,
    row_index: Option<usize>,
    hour_index: Option<usize>,
    station_id: Option<&str>,
) -> WeatherDocument {
    build_document_at(
        record,
        source_file,
        row_index,
        hour_index,
        station_id,
        Utc::now(),
    )
}

/// Build a document with an explicit creation time
pub fn build_document_at(
    record: &CanonicalRecord,
    source_file: &str,
    row_index: Option<usize>,
    hour_index: Option<usize>,
    station_id: Option<&str>,
    created_at: DateTime<Utc>,
) -> WeatherDocument {
    let speed = record.measurement(fields::SPEED);
    let gust = record.measurement(fields::GUST);
    let rate = record.measurement(fields::PRECIP_RATE);
    let accumulation = record.measurement(fields::PRECIP_ACCUM);

    let precipitation_unit = rate
        .and_then(|m| non_empty(m.unit.as_deref()))
        .or_else(|| accumulation.and_then(|m| non_empty(m.unit.as_deref())))
        .map(str::to_string);

    WeatherDocument {
        station_id: station_id.map(str::to_string),
        dh_utc: observation_time(record),
        measurements: Measurements {
            temperature: record.measurement(fields::TEMPERATURE).cloned(),
            dew_point: record.measurement(fields::DEW_POINT).cloned(),
            humidity: record.measurement(fields::HUMIDITY).cloned(),
            wind: Wind {
                speed: speed.and_then(|m| m.value),
                speed_unit: speed.and_then(|m| m.unit.clone()),
                gust: gust.and_then(|m| m.value),
                gust_unit: gust.and_then(|m| m.unit.clone()),
                direction: record.measurement(fields::WIND).and_then(|m| m.value),
                direction_original: record.raw(fields::VENT_DIRECTION_ORIGINAL).cloned(),
            },
            pressure: record.measurement(fields::PRESSURE).cloned(),
            precipitation: Precipitation {
                rate: rate.and_then(|m| m.value),
                accumulation: accumulation.and_then(|m| m.value),
                unit: precipitation_unit,
            },
            solar_radiation: record.scalar(fields::SOLAR).cloned(),
            uv_index: record.scalar(fields::UV).and_then(|s| s.value),
        },
        metadata: DocumentMetadata {
            source_file: source_file.to_string(),
            row_index,
            hour_index,
            created_at,
        },
    }
}

/// Raw `dh_utc` when set, otherwise whatever the record holds under `Time`
fn observation_time(record: &CanonicalRecord) -> Option<Value> {
    let dh_utc = record.raw(fields::DH_UTC).filter(|v| !is_blank(v));
    match dh_utc {
        Some(value) => Some(value.clone()),
        None => record
            .get(fields::TIME)
            .and_then(|field| serde_json::to_value(field).ok()),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn non_empty(unit: Option<&str>) -> Option<&str> {
    unit.filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;
    use crate::normalizer::normalizer_for;
    use chrono::TimeZone;
    use serde_json::json;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn imperial(raw: Value) -> CanonicalRecord {
        normalizer_for(SourceKind::SingleStationImperial).normalize(raw.as_object().unwrap())
    }

    fn hourly(raw: Value) -> CanonicalRecord {
        normalizer_for(SourceKind::MultiStationHourly).normalize(raw.as_object().unwrap())
    }

    #[test]
    fn test_projects_imperial_record() {
        let record = imperial(json!({
            "Time": "2024-07-01 15:54:00",
            "Temperature": "60.3 °F",
            "Humidity": "78 %",
            "Wind": "WSW",
            "Speed": "7.8 mph",
            "Gust": "9.6 mph",
            "Pressure": "29.49 in",
            "Precip. Rate.": "0.00 in",
            "Precip. Accum.": "0.07 in",
            "UV": "2",
            "Solar": "273.9 w/m²"
        }));

        let doc = build_document_at(
            &record,
            "WeatherFR/2024.csv",
            Some(4),
            None,
            Some("ILAMAD25"),
            created_at(),
        );

        assert_eq!(doc.station_id.as_deref(), Some("ILAMAD25"));
        assert_eq!(doc.dh_utc, Some(json!("2024-07-01 15:54:00")));

        let temp = doc.measurements.temperature.as_ref().unwrap();
        assert_eq!(temp.unit.as_deref(), Some("degC"));
        assert_eq!(doc.measurements.humidity.as_ref().unwrap().value, Some(78.0));
        assert!(doc.measurements.dew_point.is_none());

        assert_eq!(doc.measurements.wind.speed_unit.as_deref(), Some("km/h"));
        assert_eq!(doc.measurements.wind.direction, None);
        assert_eq!(doc.measurements.wind.direction_original, Some(json!("WSW")));

        assert_eq!(doc.measurements.precipitation.rate, Some(0.0));
        assert_eq!(doc.measurements.precipitation.unit.as_deref(), Some("mm"));
        assert_eq!(doc.measurements.uv_index, Some(2.0));
        assert_eq!(
            doc.measurements.solar_radiation.as_ref().unwrap().unit.as_deref(),
            Some("w/m²")
        );

        assert_eq!(doc.metadata.source_file, "WeatherFR/2024.csv");
        assert_eq!(doc.metadata.row_index, Some(4));
        assert_eq!(doc.metadata.hour_index, None);
        assert_eq!(doc.metadata.created_at, created_at());
    }

    #[test]
    fn test_projects_hourly_record() {
        let record = hourly(json!({
            "dh_utc": "2024-07-01 13:00:00",
            "temperature": 18.2,
            "vent_direction": 230,
            "pluie_3h": 1.4
        }));

        let doc = build_document_at(
            &record,
            "StationsMeteorologiques/a.csv",
            None,
            Some(2),
            Some("07015"),
            created_at(),
        );

        assert_eq!(doc.dh_utc, Some(json!("2024-07-01 13:00:00")));
        assert_eq!(doc.measurements.wind.direction, Some(230.0));
        assert_eq!(doc.measurements.wind.direction_original, Some(json!(230)));
        assert_eq!(doc.measurements.precipitation.rate, None);
        assert_eq!(doc.measurements.precipitation.accumulation, Some(1.4));
        assert_eq!(doc.measurements.precipitation.unit.as_deref(), Some("mm"));
        assert_eq!(doc.metadata.hour_index, Some(2));
    }

    #[test]
    fn test_numeric_imperial_wind_projects_direction() {
        let record = imperial(json!({"Wind": "225"}));
        let doc = build_document_at(&record, "k", Some(0), None, None, created_at());

        assert_eq!(doc.measurements.wind.direction, Some(225.0));
        assert_eq!(doc.measurements.wind.direction_original, None);
    }

    #[test]
    fn test_unprojected_fields_are_dropped() {
        let record = hourly(json!({"visibilite": 30000, "nebulosite": 6, "foo": "bar"}));
        let doc = build_document_at(&record, "k", None, None, None, created_at());

        let serialized = serde_json::to_value(&doc).unwrap();
        let text = serialized.to_string();
        assert!(!text.contains("Visibility"));
        assert!(!text.contains("Cloud Cover"));
        assert!(!text.contains("foo"));
    }

    #[test]
    fn test_blank_dh_utc_falls_back_to_time() {
        let record = hourly(json!({"dh_utc": ""}));
        let doc = build_document_at(&record, "k", None, None, None, created_at());
        // dh_utc maps to the Time measurement, which becomes the fallback
        assert_eq!(
            doc.dh_utc,
            Some(json!({"value": null, "unit": null, "original": ""}))
        );

        let empty = CanonicalRecord::default();
        let doc = build_document_at(&empty, "k", None, None, None, created_at());
        assert_eq!(doc.dh_utc, None);
    }

    #[test]
    fn test_document_shape() {
        let doc = build_document_at(
            &CanonicalRecord::default(),
            "k",
            Some(0),
            None,
            None,
            created_at(),
        );
        let value = serde_json::to_value(&doc).unwrap();

        let wind = &value["measurements"]["wind"];
        for key in ["speed", "speed_unit", "gust", "gust_unit", "direction", "direction_original"] {
            assert!(wind.get(key).is_some(), "missing wind.{}", key);
        }
        let precipitation = &value["measurements"]["precipitation"];
        for key in ["rate", "accumulation", "unit"] {
            assert!(precipitation.get(key).is_some(), "missing precipitation.{}", key);
        }
        assert_eq!(value["metadata"]["row_index"], json!(0));
        assert_eq!(value["metadata"]["hour_index"], Value::Null);
    }
}
