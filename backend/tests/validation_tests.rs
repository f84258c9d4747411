//! Reading validation integration tests
//!
//! Tests for the plausibility checks applied to stored readings:
//! - In-range readings pass every field
//! - Out-of-range or missing fields are reported by name

use proptest::prelude::*;
use shared::{
    validate_gps_coordinates, validate_rainfall, validate_reading, validate_solar_irradiance,
    ReadingFields,
};

fn valid_fields() -> ReadingFields {
    ReadingFields {
        temperature_c: Some(24.5),
        humidity_percent: Some(61.0),
        pressure_hpa: Some(1012.8),
        rainfall_mm: Some(0.0),
        solar_irradiance_wm2: Some(830.0),
        latitude: Some(-25.746111),
        longitude: Some(28.188056),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_realistic_reading_is_valid() {
        let report = validate_reading(&valid_fields());
        assert!(report.is_valid());
        assert!(report.errors().is_empty());
        assert_eq!(report.rainfall.message, "Valid rainfall: 0 mm");
    }

    /// Every broken field is reported, keyed by name
    #[test]
    fn test_errors_name_each_field() {
        let fields = ReadingFields {
            humidity_percent: Some(140.0),
            rainfall_mm: Some(-1.5),
            latitude: None,
            ..valid_fields()
        };

        let errors = validate_reading(&fields).errors();
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["gps", "humidity", "rainfall"]);
        assert_eq!(errors["rainfall"], "Rainfall -1.5 cannot be negative.");
        assert_eq!(errors["gps"], "GPS coordinates missing.");
    }

    #[test]
    fn test_solar_bounds() {
        assert!(validate_solar_irradiance(Some(0.0)).valid);
        assert!(validate_solar_irradiance(Some(1500.0)).valid);
        assert!(!validate_solar_irradiance(Some(1500.5)).valid);
        assert_eq!(
            validate_solar_irradiance(None).message,
            "Solar irradiance missing."
        );
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(!validate_rainfall(Some(f64::NAN)).valid);
        assert!(!validate_gps_coordinates(Some(f64::INFINITY), Some(28.0)).valid);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any reading inside every range is valid
    #[test]
    fn prop_in_range_reading_is_valid(
        temperature in -50.0f64..=80.0,
        humidity in 0.0f64..=100.0,
        pressure in 300.0f64..=1100.0,
        rainfall in 0.0f64..500.0,
        solar in 0.0f64..=1500.0,
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0
    ) {
        let fields = ReadingFields {
            temperature_c: Some(temperature),
            humidity_percent: Some(humidity),
            pressure_hpa: Some(pressure),
            rainfall_mm: Some(rainfall),
            solar_irradiance_wm2: Some(solar),
            latitude: Some(latitude),
            longitude: Some(longitude),
        };
        prop_assert!(validate_reading(&fields).is_valid());
    }

    /// Negative rainfall is always rejected
    #[test]
    fn prop_negative_rainfall_rejected(rainfall in -1000.0f64..-0.001) {
        let fields = ReadingFields {
            rainfall_mm: Some(rainfall),
            ..valid_fields()
        };
        let errors = validate_reading(&fields).errors();
        prop_assert_eq!(errors.len(), 1);
        prop_assert!(errors.contains_key("rainfall"));
    }

    /// Irradiance above the ceiling is rejected
    #[test]
    fn prop_excess_irradiance_rejected(solar in 1500.001f64..100_000.0) {
        let fields = ReadingFields {
            solar_irradiance_wm2: Some(solar),
            ..valid_fields()
        };
        let report = validate_reading(&fields);
        prop_assert!(!report.is_valid());
        prop_assert!(!report.solar_irradiance.valid);
    }
}
