//! Normalizer for single-station Weather Underground style feeds.
//!
//! These feeds embed US-customary units in every value (`"60.3 °F"`,
//! `"29.49 in"`, `"7.8 mph"`). Values are converted to metric only when
//! the detected unit triggers a rule; a converted field records the raw
//! source value as its `original`.

use super::conversion::rule_for;
use super::{RecordNormalizer, apply_scalar_fields, copy_raw};
use crate::constants::{canonical_field_name, fields};
use crate::models::{CanonicalField, CanonicalRecord, RawRecord, SourceKind};
use crate::parser::{original_text, parse_value};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImperialNormalizer;

impl RecordNormalizer for ImperialNormalizer {
    fn kind(&self) -> SourceKind {
        SourceKind::SingleStationImperial
    }

    fn normalize(&self, raw: &RawRecord) -> CanonicalRecord {
        let mut norm = BTreeMap::new();

        for (source_name, raw_value) in raw {
            let key = canonical_field_name(source_name);
            let mut measurement = parse_value(raw_value, None);

            if let Some(rule) = rule_for(key, measurement.unit.as_deref()) {
                measurement.value = measurement.value.map(rule.convert);
                measurement.unit = Some(rule.to_unit.to_string());
                measurement.original = original_text(raw_value);
            }

            norm.insert(key.to_string(), CanonicalField::Measurement(measurement));
        }

        apply_scalar_fields(raw, &mut norm);

        if let Some(Value::String(direction)) = raw.get(fields::WIND) {
            if !is_decimal_text(direction) {
                norm.insert(
                    fields::VENT_DIRECTION_ORIGINAL.to_string(),
                    CanonicalField::Raw(Value::String(direction.clone())),
                );
            }
        }

        copy_raw(raw, fields::TIME, fields::DH_UTC, &mut norm);
        copy_raw(raw, fields::STATION_ID, fields::STATION_ID, &mut norm);

        CanonicalRecord::from_fields(norm)
    }
}

/// Digits with at most one decimal point, e.g. `"225"` or `"22.5"`
fn is_decimal_text(text: &str) -> bool {
    let digits = text.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
