//! Weather API client for live conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint. Irradiance is
//! approximated from cloud cover since the free tier does not report it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, LiveCondition};

use super::LiveWeatherSource;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    clouds: Option<OWMClouds>,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient on a shared HTTP client
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(
            client,
            api_key,
            "https://api.openweathermap.org/data/2.5".to_string(),
        )
    }

    /// Create a new WeatherClient with custom base URL
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch current conditions by GPS coordinates
    pub async fn get_current_conditions(&self, at: GpsCoordinates) -> AppResult<LiveCondition> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather API request failed: {}", e);
                AppError::WeatherServiceUnavailable
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(convert_current_response(data))
    }
}

/// Convert OpenWeatherMap current response to a live condition
fn convert_current_response(data: OWMCurrentResponse) -> LiveCondition {
    let clouds = data.clouds.map(|c| c.all).unwrap_or(0.0);
    let rain = data.rain.and_then(|r| r.one_hour).unwrap_or(0.0);
    LiveCondition::from_cloud_cover(clouds, rain)
}

#[async_trait]
impl LiveWeatherSource for WeatherClient {
    async fn current_conditions(&self, at: GpsCoordinates) -> Option<LiveCondition> {
        match self.get_current_conditions(at).await {
            Ok(live) => Some(live),
            Err(e) => {
                tracing::warn!("Live weather unavailable at {}: {}", at, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> LiveCondition {
        let data: OWMCurrentResponse = serde_json::from_str(body).unwrap();
        convert_current_response(data)
    }

    #[test]
    fn test_cloud_cover_scales_irradiance() {
        let live = parse(r#"{"clouds": {"all": 25}, "rain": {"1h": 0.6}, "name": "Pretoria"}"#);
        assert!((live.solar_irradiance_wm2 - 750.0).abs() < 1e-9);
        assert!((live.rainfall_mm - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_missing_rain_block_is_dry() {
        let live = parse(r#"{"clouds": {"all": 100}}"#);
        assert_eq!(live.solar_irradiance_wm2, 0.0);
        assert_eq!(live.rainfall_mm, 0.0);
    }

    #[test]
    fn test_rain_without_hourly_total() {
        let live = parse(r#"{"clouds": {"all": 0}, "rain": {"3h": 4.0}}"#);
        assert_eq!(live.solar_irradiance_wm2, 1000.0);
        assert_eq!(live.rainfall_mm, 0.0);
    }
}
