//! Batch analysis result record

use serde::{Deserialize, Serialize};

/// Default irradiance above which conditions count as optimal (W/m²)
pub const DEFAULT_SOLAR_THRESHOLD_WM2: f64 = 800.0;

/// Default rainfall below which conditions count as optimal (mm)
pub const DEFAULT_RAIN_THRESHOLD_MM: f64 = 1.0;

/// Result of one forecast-driven route selection, handed to the API layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub average_solar: f64,
    pub average_rain: f64,
    pub instructions: Vec<String>,
    pub rain_accuracy: f64,
    /// Score of the selected route
    pub score_accuracy: f64,
    pub solar_accuracy: f64,
    pub total_distance: String,
    pub total_duration: String,
    /// Forecast conditions clear both optimal thresholds
    pub optimal: bool,
    /// No real alternatives were available; the route is synthetic
    pub placeholder: bool,
}

/// Thresholds deciding whether forecast conditions are optimal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OptimalThresholds {
    pub solar_wm2: f64,
    pub rain_mm: f64,
}

impl Default for OptimalThresholds {
    fn default() -> Self {
        Self {
            solar_wm2: DEFAULT_SOLAR_THRESHOLD_WM2,
            rain_mm: DEFAULT_RAIN_THRESHOLD_MM,
        }
    }
}

impl OptimalThresholds {
    pub fn is_optimal(&self, average_solar: f64, average_rain: f64) -> bool {
        average_solar > self.solar_wm2 && average_rain < self.rain_mm
    }
}
