//! Field-level plausibility checks for sensor readings
//!
//! Every check returns a [`FieldValidation`] instead of an error so that a
//! whole document can be reported on at once. Missing fields are invalid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of validating one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub message: String,
}

impl FieldValidation {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

// ============================================================================
// Range Checks
// ============================================================================

/// Realistic air temperature range (°C)
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-50.0, 80.0);

/// Relative humidity range (%)
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Expected barometric pressure range (hPa)
pub const PRESSURE_RANGE_HPA: (f64, f64) = (300.0, 1100.0);

/// Ground-level irradiance cannot exceed the solar constant by much (W/m²)
pub const SOLAR_RANGE_WM2: (f64, f64) = (0.0, 1500.0);

fn check_range(
    field: &str,
    value: Option<f64>,
    (min, max): (f64, f64),
    unit: &str,
) -> FieldValidation {
    let Some(v) = value else {
        return FieldValidation::invalid(format!("{} missing.", capitalize(field)));
    };
    if !v.is_finite() {
        return FieldValidation::invalid(format!("{} must be a number.", capitalize(field)));
    }
    if v < min || v > max {
        return FieldValidation::invalid(format!(
            "{} {} out of realistic range ({} to {} {}).",
            capitalize(field),
            v,
            min,
            max,
            unit
        ));
    }
    FieldValidation::ok(format!("Valid {}: {} {}", field, v, unit))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validate air temperature in °C
pub fn validate_temperature(temperature_c: Option<f64>) -> FieldValidation {
    check_range("temperature", temperature_c, TEMPERATURE_RANGE_C, "°C")
}

/// Validate relative humidity in %
pub fn validate_humidity(humidity_pct: Option<f64>) -> FieldValidation {
    check_range("humidity", humidity_pct, HUMIDITY_RANGE_PCT, "%")
}

/// Validate barometric pressure in hPa
pub fn validate_pressure(pressure_hpa: Option<f64>) -> FieldValidation {
    check_range("pressure", pressure_hpa, PRESSURE_RANGE_HPA, "hPa")
}

/// Validate solar irradiance in W/m²
pub fn validate_solar_irradiance(solar_wm2: Option<f64>) -> FieldValidation {
    check_range("solar irradiance", solar_wm2, SOLAR_RANGE_WM2, "W/m²")
}

/// Validate rainfall in mm; rainfall is never negative
pub fn validate_rainfall(rainfall_mm: Option<f64>) -> FieldValidation {
    let Some(v) = rainfall_mm else {
        return FieldValidation::invalid("Rainfall missing.");
    };
    if !v.is_finite() {
        return FieldValidation::invalid("Rainfall must be a number.");
    }
    if v < 0.0 {
        return FieldValidation::invalid(format!("Rainfall {} cannot be negative.", v));
    }
    FieldValidation::ok(format!("Valid rainfall: {} mm", v))
}

/// Validate a latitude/longitude pair
pub fn validate_gps_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> FieldValidation {
    let (Some(lat), Some(lon)) = (latitude, longitude) else {
        return FieldValidation::invalid("GPS coordinates missing.");
    };
    if !lat.is_finite() || !lon.is_finite() {
        return FieldValidation::invalid("GPS coordinates must be numbers.");
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return FieldValidation::invalid(format!(
            "GPS coordinates ({}, {}) out of range.",
            lat, lon
        ));
    }
    FieldValidation::ok(format!("Valid GPS coordinates: ({}, {})", lat, lon))
}

// ============================================================================
// Document Validation
// ============================================================================

/// Raw sensor fields of one stored reading
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReadingFields {
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub solar_irradiance_wm2: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Per-field validation of one reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub temperature: FieldValidation,
    pub humidity: FieldValidation,
    pub pressure: FieldValidation,
    pub rainfall: FieldValidation,
    pub solar_irradiance: FieldValidation,
    pub gps: FieldValidation,
}

impl ValidationReport {
    fn fields(&self) -> [(&'static str, &FieldValidation); 6] {
        [
            ("temperature", &self.temperature),
            ("humidity", &self.humidity),
            ("pressure", &self.pressure),
            ("rainfall", &self.rainfall),
            ("solar_irradiance", &self.solar_irradiance),
            ("gps", &self.gps),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.fields().iter().all(|(_, f)| f.valid)
    }

    /// Messages of the invalid fields, keyed by field name
    pub fn errors(&self) -> BTreeMap<String, String> {
        self.fields()
            .iter()
            .filter(|(_, f)| !f.valid)
            .map(|(name, f)| (name.to_string(), f.message.clone()))
            .collect()
    }
}

/// Validate every field of a reading
pub fn validate_reading(fields: &ReadingFields) -> ValidationReport {
    ValidationReport {
        temperature: validate_temperature(fields.temperature_c),
        humidity: validate_humidity(fields.humidity_percent),
        pressure: validate_pressure(fields.pressure_hpa),
        rainfall: validate_rainfall(fields.rainfall_mm),
        solar_irradiance: validate_solar_irradiance(fields.solar_irradiance_wm2),
        gps: validate_gps_coordinates(fields.latitude, fields.longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let v = validate_humidity(None);
        assert!(!v.valid);
        assert_eq!(v.message, "Humidity missing.");
    }

    #[test]
    fn test_capitalize_multiword() {
        assert_eq!(capitalize("solar irradiance"), "Solar irradiance");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_range_bounds_inclusive() {
        assert!(validate_temperature(Some(-50.0)).valid);
        assert!(validate_temperature(Some(80.0)).valid);
        assert!(validate_pressure(Some(300.0)).valid);
        assert!(!validate_pressure(Some(299.9)).valid);
    }
}
