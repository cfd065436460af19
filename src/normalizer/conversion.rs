//! Unit-gated conversion rules for imperial sources.
//!
//! A rule fires only when the field name and the unit detected in the
//! source text both match. Values already in metric units are left alone.

use crate::constants::{INCH_TO_MM, INHG_TO_HPA, MPH_TO_KMH, fields, units};

/// One imperial-to-metric conversion
#[derive(Debug, Clone, Copy)]
pub struct ConversionRule {
    pub fields: &'static [&'static str],
    pub from_unit: &'static str,
    pub to_unit: &'static str,
    pub convert: fn(f64) -> f64,
}

/// Fahrenheit to Celsius
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Inches of mercury to hectopascals
pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * INHG_TO_HPA
}

/// Miles per hour to kilometres per hour
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * MPH_TO_KMH
}

/// Inches to millimetres
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * INCH_TO_MM
}

pub const CONVERSION_RULES: &[ConversionRule] = &[
    ConversionRule {
        fields: &[fields::TEMPERATURE, fields::DEW_POINT],
        from_unit: units::FAHRENHEIT,
        to_unit: units::CELSIUS,
        convert: fahrenheit_to_celsius,
    },
    ConversionRule {
        fields: &[fields::PRESSURE],
        from_unit: units::INCH,
        to_unit: units::HECTOPASCAL,
        convert: inhg_to_hpa,
    },
    ConversionRule {
        fields: &[fields::SPEED, fields::GUST],
        from_unit: units::MPH,
        to_unit: units::KMH,
        convert: mph_to_kmh,
    },
    ConversionRule {
        fields: &[fields::PRECIP_RATE, fields::PRECIP_ACCUM],
        from_unit: units::INCH,
        to_unit: units::MILLIMETRE,
        convert: inches_to_mm,
    },
];

/// Find the rule triggered by a canonical field carrying `unit`
pub fn rule_for(field: &str, unit: Option<&str>) -> Option<&'static ConversionRule> {
    let unit = unit?;
    CONVERSION_RULES
        .iter()
        .find(|rule| rule.from_unit == unit && rule.fields.contains(&field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_functions() {
        assert!((fahrenheit_to_celsius(60.3) - 15.722).abs() < 0.01);
        assert!((fahrenheit_to_celsius(32.0)).abs() < f64::EPSILON);
        assert!((inhg_to_hpa(29.49) - 998.6).abs() < 0.5);
        assert!((mph_to_kmh(7.8) - 12.55).abs() < 0.05);
        assert!((inches_to_mm(0.07) - 1.778).abs() < 1e-9);
    }

    #[test]
    fn test_rule_lookup_is_unit_gated() {
        let rule = rule_for("Temperature", Some("°F")).unwrap();
        assert_eq!(rule.to_unit, "degC");

        assert!(rule_for("Temperature", Some("degC")).is_none());
        assert!(rule_for("Temperature", None).is_none());
        assert!(rule_for("Humidity", Some("%")).is_none());
    }

    #[test]
    fn test_inch_depends_on_field() {
        assert_eq!(rule_for("Pressure", Some("in")).unwrap().to_unit, "hPa");
        assert_eq!(rule_for("Precip. Rate.", Some("in")).unwrap().to_unit, "mm");
        assert_eq!(rule_for("Precip. Accum.", Some("in")).unwrap().to_unit, "mm");
        assert!(rule_for("Visibility", Some("in")).is_none());
    }

    #[test]
    fn test_wind_rules() {
        assert_eq!(rule_for("Speed", Some("mph")).unwrap().to_unit, "km/h");
        assert_eq!(rule_for("Gust", Some("mph")).unwrap().to_unit, "km/h");
        assert!(rule_for("Speed", Some("km/h")).is_none());
    }
}
