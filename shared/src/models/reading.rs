//! Environmental reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// A historical observation used for forecasting (batch mode)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub solar_irradiance_wm2: f64,
    pub rainfall_mm: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, solar_irradiance_wm2: f64, rainfall_mm: f64) -> Self {
        Self {
            timestamp,
            solar_irradiance_wm2,
            rainfall_mm,
        }
    }
}

/// Rain sensor state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RainState {
    Wet,
    #[default]
    Dry,
}

impl RainState {
    /// Rain sensors report 1 for wet, anything else for dry
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            RainState::Wet
        } else {
            RainState::Dry
        }
    }

    pub fn is_wet(&self) -> bool {
        matches!(self, RainState::Wet)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RainState::Wet => "WET",
            RainState::Dry => "DRY",
        }
    }
}

/// Current sensor conditions driving the cost-mode scorer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SensorConditions {
    pub humidity_pct: Option<f64>,
    pub lux: Option<f64>,
    pub rain: RainState,
}

/// One live telemetry sample from the monitoring device (streaming mode)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Telemetry {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub lux: Option<f64>,
    pub rain: RainState,
    pub position: GpsCoordinates,
    pub timestamp: DateTime<Utc>,
}

impl Telemetry {
    pub fn conditions(&self) -> SensorConditions {
        SensorConditions {
            humidity_pct: self.humidity_pct,
            lux: self.lux,
            rain: self.rain,
        }
    }
}
