//! Record normalizers for the supported source schemas.
//!
//! Each source kind gets its own [`RecordNormalizer`] implementation:
//! - [`ImperialNormalizer`] converts US-customary units found in the text
//! - [`HourlyNormalizer`] only fills units the source left out
//!
//! Both share the field mapping from [`crate::constants`] and the value
//! parser. Running the imperial rules over hourly data would convert
//! already-metric values a second time, so the two paths never mix.
//!
//! ```rust
//! use serde_json::json;
//! use weatherhub_ingest::models::SourceKind;
//! use weatherhub_ingest::normalizer::normalizer_for;
//!
//! let raw = json!({"Temperature": "60.3 °F"});
//! let record = normalizer_for(SourceKind::SingleStationImperial)
//!     .normalize(raw.as_object().unwrap());
//! let temperature = record.measurement("Temperature").unwrap();
//! assert_eq!(temperature.unit.as_deref(), Some("degC"));
//! ```

pub mod conversion;
pub mod hourly;
pub mod imperial;

pub use hourly::HourlyNormalizer;
pub use imperial::ImperialNormalizer;

use crate::constants::{fields, units};
use crate::models::{CanonicalField, CanonicalRecord, RawRecord, Scalar, SourceKind};
use crate::parser::parse_value;
use std::collections::BTreeMap;

/// Maps a raw record onto the canonical record shape
pub trait RecordNormalizer: Send + Sync {
    /// Source kind this normalizer accepts
    fn kind(&self) -> SourceKind;

    /// Normalize one raw record
    fn normalize(&self, raw: &RawRecord) -> CanonicalRecord;
}

static IMPERIAL: ImperialNormalizer = ImperialNormalizer;
static HOURLY: HourlyNormalizer = HourlyNormalizer;

/// Select the normalizer for a source kind
pub fn normalizer_for(kind: SourceKind) -> &'static dyn RecordNormalizer {
    match kind {
        SourceKind::SingleStationImperial => &IMPERIAL,
        SourceKind::MultiStationHourly => &HOURLY,
    }
}

/// Overwrite the `UV` and `Solar` entries with their value-only forms
fn apply_scalar_fields(raw: &RawRecord, norm: &mut BTreeMap<String, CanonicalField>) {
    if let Some(uv) = raw.get(fields::UV) {
        norm.insert(
            fields::UV.to_string(),
            CanonicalField::Scalar(Scalar {
                value: parse_value(uv, None).value,
                unit: None,
            }),
        );
    }
    if let Some(solar) = raw.get(fields::SOLAR) {
        norm.insert(
            fields::SOLAR.to_string(),
            CanonicalField::Scalar(Scalar {
                value: parse_value(solar, None).value,
                unit: Some(units::WATTS_PER_SQUARE_METRE.to_string()),
            }),
        );
    }
}

/// Copy a raw field verbatim under a new canonical name
fn copy_raw(
    raw: &RawRecord,
    from: &str,
    to: &str,
    norm: &mut BTreeMap<String, CanonicalField>,
) {
    if let Some(value) = raw.get(from) {
        norm.insert(to.to_string(), CanonicalField::Raw(value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_factory_selects_by_kind() {
        assert_eq!(
            normalizer_for(SourceKind::SingleStationImperial).kind(),
            SourceKind::SingleStationImperial
        );
        assert_eq!(
            normalizer_for(SourceKind::MultiStationHourly).kind(),
            SourceKind::MultiStationHourly
        );
    }

    #[test]
    fn test_same_input_differs_by_kind() {
        let raw = json!({"temperature": "60.3 °F", "pression": "1013"});
        let raw = raw.as_object().unwrap();

        let imperial = normalizer_for(SourceKind::SingleStationImperial).normalize(raw);
        let hourly = normalizer_for(SourceKind::MultiStationHourly).normalize(raw);

        let imperial_temp = imperial.measurement("Temperature").unwrap();
        assert_eq!(imperial_temp.unit.as_deref(), Some("degC"));

        // The hourly path keeps the detected unit and never converts
        let hourly_temp = hourly.measurement("Temperature").unwrap();
        assert_eq!(hourly_temp.value, Some(60.3));
        assert_eq!(hourly_temp.unit.as_deref(), Some("°F"));

        assert_eq!(imperial.measurement("Pressure").unwrap().unit, None);
        assert_eq!(
            hourly.measurement("Pressure").unwrap().unit.as_deref(),
            Some("hPa")
        );
    }

    #[test]
    fn test_scalar_fields_replace_measurements() {
        let raw = json!({"UV": "2", "Solar": "273.9 w/m²"});
        let mut norm = BTreeMap::new();
        apply_scalar_fields(raw.as_object().unwrap(), &mut norm);

        assert_eq!(
            norm.get("UV"),
            Some(&CanonicalField::Scalar(Scalar {
                value: Some(2.0),
                unit: None
            }))
        );
        assert_eq!(
            norm.get("Solar"),
            Some(&CanonicalField::Scalar(Scalar {
                value: Some(273.9),
                unit: Some("w/m²".to_string())
            }))
        );
    }
}
