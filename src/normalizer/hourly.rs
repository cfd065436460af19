//! Normalizer for the multi-station hourly feed.
//!
//! Values in this feed are already metric; some entries only lack the unit
//! string. Missing units are filled from [`DEFAULT_UNITS`](crate::constants::DEFAULT_UNITS)
//! and no numeric conversion is ever applied.

use super::{RecordNormalizer, apply_scalar_fields, copy_raw};
use crate::constants::{canonical_field_name, default_unit, fields};
use crate::models::{CanonicalField, CanonicalRecord, RawRecord, SourceKind};
use crate::parser::parse_value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct HourlyNormalizer;

impl RecordNormalizer for HourlyNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::MultiStationHourly
    }

    fn normalize(&self, raw: &RawRecord) -> CanonicalRecord {
        let mut norm = BTreeMap::new();

        for (source_name, raw_value) in raw {
            let key = canonical_field_name(source_name);
            let mut measurement = parse_value(raw_value, None);

            if measurement.unit.is_none() {
                measurement.unit = default_unit(key).map(str::to_string);
            }

            norm.insert(key.to_string(), CanonicalField::Measurement(measurement));
        }

        apply_scalar_fields(raw, &mut norm);
        copy_raw(
            raw,
            fields::VENT_DIRECTION,
            fields::VENT_DIRECTION_ORIGINAL,
            &mut norm,
        );
        copy_raw(raw, fields::DH_UTC, fields::DH_UTC, &mut norm);

        CanonicalRecord::from_fields(norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn normalize(raw: Value) -> CanonicalRecord {
        HourlyNormalizer.normalize(raw.as_object().unwrap())
    }

    #[test]
    fn test_pressure_gets_default_unit() {
        let record = normalize(json!({"pression": "1013"}));
        let pressure = record.measurement("Pressure").unwrap();
        assert_eq!(pressure.value, Some(1013.0));
        assert_eq!(pressure.unit.as_deref(), Some("hPa"));
        assert_eq!(pressure.original.as_deref(), Some("1013"));
    }

    #[test]
    fn test_default_units_for_numeric_values() {
        let record = normalize(json!({
            "temperature": 12.4,
            "point_de_rosee": 8.1,
            "humidite": 77,
            "vent_moyen": 14.0,
            "vent_rafales": 25.2,
            "pluie_1h": 0.2,
            "pluie_3h": 1.4
        }));

        let unit = |name: &str| record.measurement(name).unwrap().unit.clone();
        assert_eq!(unit("Temperature").as_deref(), Some("degC"));
        assert_eq!(unit("Dew Point").as_deref(), Some("degC"));
        assert_eq!(unit("Humidity").as_deref(), Some("%"));
        assert_eq!(unit("Speed").as_deref(), Some("km/h"));
        assert_eq!(unit("Gust").as_deref(), Some("km/h"));
        assert_eq!(unit("Precip. Rate.").as_deref(), Some("mm"));
        assert_eq!(unit("Precip. Accum.").as_deref(), Some("mm"));
    }

    #[test]
    fn test_never_converts_values() {
        let record = normalize(json!({
            "temperature": 60.3,
            "pression": 29.49,
            "vent_moyen": 7.8,
            "pluie_1h": 0.07
        }));

        assert_eq!(record.measurement("Temperature").unwrap().value, Some(60.3));
        assert_eq!(record.measurement("Pressure").unwrap().value, Some(29.49));
        assert_eq!(record.measurement("Speed").unwrap().value, Some(7.8));
        assert_eq!(record.measurement("Precip. Rate.").unwrap().value, Some(0.07));
    }

    #[test]
    fn test_detected_unit_is_kept() {
        let record = normalize(json!({"pression": "1013 mbar"}));
        let pressure = record.measurement("Pressure").unwrap();
        assert_eq!(pressure.unit.as_deref(), Some("mbar"));
    }

    #[test]
    fn test_missing_value_still_gets_unit() {
        let record = normalize(json!({"temperature": null}));
        let temp = record.measurement("Temperature").unwrap();
        assert_eq!(temp.value, None);
        assert_eq!(temp.unit.as_deref(), Some("degC"));
        assert_eq!(temp.original, None);
    }

    #[test]
    fn test_passthrough_fields() {
        let record = normalize(json!({
            "dh_utc": "2024-07-01 13:00:00",
            "vent_direction": 230,
            "visibilite": 30000
        }));

        assert_eq!(record.raw("dh_utc"), Some(&json!("2024-07-01 13:00:00")));
        assert_eq!(record.raw("vent_direction_original"), Some(&json!(230)));

        let wind = record.measurement("Wind").unwrap();
        assert_eq!(wind.value, Some(230.0));
        assert_eq!(wind.unit, None);

        let visibility = record.measurement("Visibility").unwrap();
        assert_eq!(visibility.value, Some(30000.0));
        assert_eq!(visibility.unit, None);

        // dh_utc is also mapped to the Time measurement
        assert!(record.measurement("Time").is_some());
    }

    #[test]
    fn test_scalar_fields_idempotent() {
        let first = normalize(json!({"UV": "3", "Solar": "412.5"}));
        let uv = first.scalar("UV").unwrap().value;
        let solar = first.scalar("Solar").unwrap().value;

        let second = normalize(json!({"UV": uv, "Solar": solar}));
        assert_eq!(second.scalar("UV").unwrap().value, uv);
        assert_eq!(second.scalar("Solar").unwrap().value, solar);
        assert_eq!(second.scalar("Solar").unwrap().unit.as_deref(), Some("w/m²"));
    }

    #[test]
    fn test_unknown_field_passes_through() {
        let record = normalize(json!({"foo": "bar", "neige_au_sol": "4 cm"}));

        let foo = record.measurement("foo").unwrap();
        assert_eq!(foo.value, None);
        assert_eq!(foo.original.as_deref(), Some("bar"));

        let snow = record.measurement("neige_au_sol").unwrap();
        assert_eq!(snow.value, Some(4.0));
        assert_eq!(snow.unit.as_deref(), Some("cm"));
    }
}
