//! Forecast and live-condition models

use serde::{Deserialize, Serialize};

/// Environmental signal being forecast
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Solar,
    Rain,
}

/// Forecast of a single signal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalForecast {
    /// Next `horizon` points, or `None` when the model could not be fitted
    pub forecast: Option<Vec<f64>>,
    /// In-sample accuracy in [0, 100]
    pub accuracy_pct: f64,
}

impl SignalForecast {
    pub fn unavailable() -> Self {
        Self {
            forecast: None,
            accuracy_pct: 0.0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.forecast.is_some()
    }
}

/// Forecast of both signals from one batch of readings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherForecast {
    pub solar: SignalForecast,
    pub rain: SignalForecast,
}

impl WeatherForecast {
    /// A batch can only be scored when both signals were forecast
    pub fn is_complete(&self) -> bool {
        self.solar.is_available() && self.rain.is_available()
    }
}

/// Current-moment conditions from a live weather provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LiveCondition {
    pub solar_irradiance_wm2: f64,
    pub rainfall_mm: f64,
}

impl LiveCondition {
    /// Clear-sky irradiance used to estimate solar input from cloud cover
    pub const CLEAR_SKY_IRRADIANCE_WM2: f64 = 1000.0;

    /// Estimate irradiance from a cloud coverage percentage
    pub fn from_cloud_cover(cloud_coverage_percent: f64, rainfall_mm: f64) -> Self {
        let cover = cloud_coverage_percent.clamp(0.0, 100.0);
        Self {
            solar_irradiance_wm2: Self::CLEAR_SKY_IRRADIANCE_WM2 * (1.0 - cover / 100.0),
            rainfall_mm,
        }
    }
}
