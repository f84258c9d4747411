//! Database models for the Solar Route Planner
//!
//! Re-exports models from the shared crate and adds backend-specific models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub use shared::models::*;
use shared::validation::ReadingFields;

/// One stored sensor reading, as persisted in `readings`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StoredReading {
    pub id: i64,
    pub series_id: String,
    pub recorded_at: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub solar_irradiance_wm2: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StoredReading {
    pub fn fields(&self) -> ReadingFields {
        ReadingFields {
            temperature_c: self.temperature_c,
            humidity_percent: self.humidity_percent,
            pressure_hpa: self.pressure_hpa,
            rainfall_mm: self.rainfall_mm,
            solar_irradiance_wm2: self.solar_irradiance_wm2,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Forecasting view; `None` when either signal was not recorded
    pub fn to_reading(&self) -> Option<Reading> {
        Some(Reading::new(
            self.recorded_at,
            self.solar_irradiance_wm2?,
            self.rainfall_mm?,
        ))
    }
}

/// Number of readings stored for one series
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SeriesSummary {
    pub series_id: String,
    pub readings: i64,
    pub last_recorded_at: Option<DateTime<Utc>>,
}

/// A reading that failed validation, with per-field messages
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvalidReading {
    pub reading_id: i64,
    pub series_id: String,
    pub errors: serde_json::Value,
    pub logged_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored(solar: Option<f64>, rain: Option<f64>) -> StoredReading {
        StoredReading {
            id: 7,
            series_id: "ESP32_data".to_string(),
            recorded_at: Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap(),
            temperature_c: Some(22.0),
            humidity_percent: Some(55.0),
            pressure_hpa: Some(1012.0),
            rainfall_mm: rain,
            solar_irradiance_wm2: solar,
            latitude: Some(-25.75),
            longitude: Some(28.19),
        }
    }

    #[test]
    fn test_to_reading_requires_both_signals() {
        assert!(stored(Some(900.0), Some(0.0)).to_reading().is_some());
        assert!(stored(None, Some(0.0)).to_reading().is_none());
        assert!(stored(Some(900.0), None).to_reading().is_none());
    }

    #[test]
    fn test_fields_feed_validation() {
        let report = shared::validate_reading(&stored(Some(900.0), Some(0.0)).fields());
        assert!(report.is_valid());
    }
}
