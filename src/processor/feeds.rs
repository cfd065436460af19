//! Per-feed row import
//!
//! Turns the payload rows of one export file into station and weather
//! documents. A row either yields all of its documents or none: any
//! structural problem fails the row, is logged, and the file continues
//! with the next row.

use super::discovery::SourceObject;
use super::reader::{decode_payload, json_type, read_payload_column};
use crate::constants::payload_keys;
use crate::document::{WeatherDocument, build_document};
use crate::error::{IngestError, Result};
use crate::models::{RawRecord, SourceFeed, SourceKind};
use crate::normalizer::{RecordNormalizer, normalizer_for};
use crate::station::{StationDocument, StationProfile, profile_for};
use serde_json::Value;
use tracing::{debug, error};

/// Documents produced from one export file
#[derive(Debug, Clone)]
pub struct FileImport {
    pub key: String,
    pub feed: SourceFeed,
    /// Profile to register before the documents are written
    pub profile: Option<&'static StationProfile>,
    pub stations: Vec<StationDocument>,
    pub documents: Vec<WeatherDocument>,
    pub rows_processed: usize,
    pub rows_failed: usize,
}

/// Documents produced from one payload row
#[derive(Debug, Default)]
struct RowImport {
    stations: Vec<StationDocument>,
    documents: Vec<WeatherDocument>,
}

/// Read, classify and normalize one export file
pub fn import_file(object: &SourceObject, payload_column: &str) -> Result<FileImport> {
    let feed = SourceFeed::from_key(&object.key).ok_or_else(|| IngestError::UnrecognizedSource {
        key: object.key.clone(),
    })?;

    let payloads = read_payload_column(&object.path, &object.key, payload_column)?;
    Ok(import_payloads(&object.key, feed, &payloads))
}

/// Normalize already extracted payload cells of a file
pub fn import_payloads(key: &str, feed: SourceFeed, payloads: &[Option<String>]) -> FileImport {
    let normalizer = normalizer_for(feed.kind());
    let profile = profile_for(feed);

    let mut import = FileImport {
        key: key.to_string(),
        feed,
        profile,
        stations: Vec::new(),
        documents: Vec::new(),
        rows_processed: 0,
        rows_failed: 0,
    };

    for (row, cell) in payloads.iter().enumerate() {
        let result = decode_payload(cell.as_deref(), key, row).and_then(|payload| {
            match (feed.kind(), profile) {
                (SourceKind::SingleStationImperial, Some(profile)) => Ok(single_station_row(
                    &payload, key, row, profile, normalizer,
                )),
                _ => hourly_row(&payload, key, row, normalizer),
            }
        });

        match result {
            Ok(row_import) => {
                import.stations.extend(row_import.stations);
                import.documents.extend(row_import.documents);
                import.rows_processed += 1;
            }
            Err(e) => {
                error!("{}", e);
                import.rows_failed += 1;
            }
        }
    }

    debug!(
        "{}: {} rows, {} failed, {} documents, {} stations",
        key,
        import.rows_processed,
        import.rows_failed,
        import.documents.len(),
        import.stations.len()
    );

    import
}

/// Row of a Weather Underground feed: one observation of the feed's station
fn single_station_row(
    payload: &RawRecord,
    key: &str,
    row: usize,
    profile: &StationProfile,
    normalizer: &dyn RecordNormalizer,
) -> RowImport {
    let record = normalizer.normalize(payload).with_station_id(profile.id);
    let document = build_document(&record, key, Some(row), None, Some(profile.id));

    RowImport {
        stations: Vec::new(),
        documents: vec![document],
    }
}

/// Row of the multi-station feed: station descriptions plus hourly series per station
fn hourly_row(
    payload: &RawRecord,
    key: &str,
    row: usize,
    normalizer: &dyn RecordNormalizer,
) -> Result<RowImport> {
    let mut row_import = RowImport::default();

    if let Some(stations) = payload.get(payload_keys::STATIONS) {
        let stations = stations.as_array().ok_or_else(|| {
            IngestError::malformed_row(
                key,
                row,
                format!("'stations' is a {}, expected an array", json_type(stations)),
            )
        })?;
        for station in stations {
            let station = station.as_object().ok_or_else(|| {
                IngestError::malformed_row(
                    key,
                    row,
                    format!("station entry is a {}, expected an object", json_type(station)),
                )
            })?;
            row_import
                .stations
                .push(StationDocument::from_payload(station.clone(), key));
        }
    }

    match payload.get(payload_keys::HOURLY) {
        Some(Value::Object(hourly)) => {
            debug!("Row {}: hourly data for {} stations", row, hourly.len());
            for (station_id, records) in hourly {
                let records = records.as_array().ok_or_else(|| {
                    IngestError::malformed_row(
                        key,
                        row,
                        format!(
                            "hourly series of {} is a {}, expected an array",
                            station_id,
                            json_type(records)
                        ),
                    )
                })?;

                for (hour_index, record) in records.iter().enumerate() {
                    let record = record.as_object().ok_or_else(|| {
                        IngestError::malformed_row(
                            key,
                            row,
                            format!(
                                "hourly record {} of {} is a {}, expected an object",
                                hour_index,
                                station_id,
                                json_type(record)
                            ),
                        )
                    })?;
                    let canonical = normalizer.normalize(record);
                    row_import.documents.push(build_document(
                        &canonical,
                        key,
                        None,
                        Some(hour_index),
                        Some(station_id),
                    ));
                }
            }
        }
        Some(other) => debug!("Row {}: ignoring hourly value of type {}", row, json_type(other)),
        None => debug!("Row {}: no hourly key", row),
    }

    Ok(row_import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(values: &[Value]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_single_station_rows() {
        let payloads = cells(&[
            json!({"Time": "2024-07-01 15:54:00", "Temperature": "60.3 °F"}),
            json!({"Time": "2024-07-01 16:04:00", "Temperature": "61.0 °F"}),
        ]);

        let import = import_payloads("WeatherBE/a.csv", SourceFeed::WeatherBe, &payloads);

        assert_eq!(import.profile.unwrap().id, "IICHTE19");
        assert_eq!(import.rows_processed, 2);
        assert_eq!(import.rows_failed, 0);
        assert_eq!(import.documents.len(), 2);
        assert!(import.stations.is_empty());

        let doc = &import.documents[1];
        assert_eq!(doc.station_id.as_deref(), Some("IICHTE19"));
        assert_eq!(doc.metadata.row_index, Some(1));
        assert_eq!(doc.metadata.hour_index, None);
        assert_eq!(doc.dh_utc, Some(json!("2024-07-01 16:04:00")));
    }

    #[test]
    fn test_hourly_rows() {
        let payloads = cells(&[json!({
            "stations": [{"id": "07015", "name": "LILLE-LESQUIN"}],
            "hourly": {
                "07015": [
                    {"dh_utc": "2024-07-01 00:00:00", "temperature": "14.2"},
                    {"dh_utc": "2024-07-01 01:00:00", "temperature": "13.9"}
                ],
                "00052": [
                    {"dh_utc": "2024-07-01 00:00:00", "pression": "1013"}
                ]
            }
        })]);

        let import = import_payloads(
            "StationsMeteorologiques/a.csv",
            SourceFeed::StationsMeteorologiques,
            &payloads,
        );

        assert!(import.profile.is_none());
        assert_eq!(import.stations.len(), 1);
        assert_eq!(import.documents.len(), 3);

        let second = &import.documents[1];
        assert_eq!(second.station_id.as_deref(), Some("07015"));
        assert_eq!(second.metadata.row_index, None);
        assert_eq!(second.metadata.hour_index, Some(1));
        assert_eq!(
            second.measurements.temperature.as_ref().unwrap().unit.as_deref(),
            Some("degC")
        );

        let third = &import.documents[2];
        assert_eq!(third.station_id.as_deref(), Some("00052"));
        assert_eq!(third.metadata.hour_index, Some(0));
        assert_eq!(
            third.measurements.pressure.as_ref().unwrap().unit.as_deref(),
            Some("hPa")
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped_whole() {
        let payloads = vec![
            Some("{broken".to_string()),
            None,
            Some(json!({"hourly": {"07015": [{"temperature": 1}, "oops"]}}).to_string()),
            Some(json!({"stations": "07015"}).to_string()),
            Some(json!({"hourly": {"07015": [{"temperature": 2}]}}).to_string()),
        ];

        let import = import_payloads(
            "StationsMeteorologiques/a.csv",
            SourceFeed::StationsMeteorologiques,
            &payloads,
        );

        assert_eq!(import.rows_failed, 4);
        assert_eq!(import.rows_processed, 1);
        // The partially valid third row contributes nothing
        assert_eq!(import.documents.len(), 1);
        assert_eq!(
            import.documents[0].measurements.temperature.as_ref().unwrap().value,
            Some(2.0)
        );
    }

    #[test]
    fn test_row_without_hourly_key() {
        let payloads = cells(&[json!({"meta": 1}), json!({"hourly": []})]);
        let import = import_payloads(
            "StationsMeteorologiques/a.csv",
            SourceFeed::StationsMeteorologiques,
            &payloads,
        );
        assert_eq!(import.rows_processed, 2);
        assert!(import.documents.is_empty());
    }

    #[test]
    fn test_unrecognized_key() {
        let object = SourceObject {
            key: "misc/other.csv".to_string(),
            path: "misc/other.csv".into(),
        };
        match import_file(&object, "_airbyte_data").unwrap_err() {
            IngestError::UnrecognizedSource { key } => assert_eq!(key, "misc/other.csv"),
            other => panic!("Expected UnrecognizedSource, got {:?}", other),
        }
    }
}
