//! Value parser for raw observation fields.
//!
//! Turns a raw field value (text such as `"60.3 °F"`, a bare number, or
//! null) into a [`Measurement`] triple. Parsing never fails: a value that
//! carries no number is represented as an absent value.

use crate::models::Measurement;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// First signed decimal number in a text
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("valid number pattern"));

/// First run of unit characters (letters, percent, degree sign, slash)
static UNIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z%°/]+").expect("valid unit pattern"));

/// Parse a raw field value into a measurement.
///
/// `default_unit` is used whenever no unit can be read from the value.
/// Booleans, arrays and objects carry no value, only their JSON text.
pub fn parse_value(raw: &Value, default_unit: Option<&str>) -> Measurement {
    let default_unit = default_unit.map(str::to_string);

    match raw {
        Value::Null => Measurement::new(None, default_unit, None),
        Value::Number(number) => {
            Measurement::new(number.as_f64(), default_unit, Some(number.to_string()))
        }
        Value::String(text) => parse_text(text, default_unit),
        other => Measurement::new(None, default_unit, Some(other.to_string())),
    }
}

/// Parse a text value, accepting a decimal comma
pub fn parse_text(text: &str, default_unit: Option<String>) -> Measurement {
    let normalized = text.replace(',', ".");

    let value = NUMBER_PATTERN
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok());

    let unit = UNIT_PATTERN
        .find(&normalized)
        .map(|m| m.as_str().to_string())
        .or(default_unit);

    Measurement::new(value, unit, Some(text.to_string()))
}

/// Textual form of a raw value, as recorded in `original`
pub fn original_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
