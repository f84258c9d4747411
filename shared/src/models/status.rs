//! Route status records exposed to API callers

use serde::{Deserialize, Serialize};

use super::reading::{RainState, Telemetry};

/// Why the current route was chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RouteStatus {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "optimized for rain")]
    OptimizedForRain,
    #[serde(rename = "optimized for high humidity")]
    OptimizedForHumidity,
    #[serde(rename = "optimized for low solar irradiance")]
    OptimizedForLowLight,
}

impl RouteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Unknown => "unknown",
            RouteStatus::Normal => "normal",
            RouteStatus::OptimizedForRain => "optimized for rain",
            RouteStatus::OptimizedForHumidity => "optimized for high humidity",
            RouteStatus::OptimizedForLowLight => "optimized for low solar irradiance",
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The currently selected route as shown to drivers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RouteView {
    pub status: RouteStatus,
    pub estimated_time: Option<String>,
    pub steps: Vec<String>,
}

/// Latest sensor values; `None` when the device did not report a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SensorsView {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub light: Option<f64>,
    pub rain: Option<RainState>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Telemetry> for SensorsView {
    fn from(t: &Telemetry) -> Self {
        Self {
            temperature: t.temperature_c,
            humidity: t.humidity_pct,
            light: t.lux,
            rain: Some(t.rain),
            latitude: Some(t.position.latitude),
            longitude: Some(t.position.longitude),
        }
    }
}

/// Streaming-mode status record: sensors paired with the route they produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StreamingStatus {
    pub sensors: SensorsView,
    pub route: RouteView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_label() {
        for status in [
            RouteStatus::Unknown,
            RouteStatus::Normal,
            RouteStatus::OptimizedForRain,
            RouteStatus::OptimizedForHumidity,
            RouteStatus::OptimizedForLowLight,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
        }
    }
}
