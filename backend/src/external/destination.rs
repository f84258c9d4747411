//! Local GPS API client providing the monitoring destination

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::GpsCoordinates;
use tokio::sync::watch;

use super::DestinationSource;
use crate::error::{AppError, AppResult};

/// Destination API client; answers the fallback when no API is configured
#[derive(Clone)]
pub struct DestinationClient {
    client: Client,
    api_url: Option<String>,
    fallback: GpsCoordinates,
}

/// Latest position published by the local GPS API
#[derive(Debug, Deserialize)]
struct LatestPosition {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl DestinationClient {
    pub fn new(client: Client, api_url: Option<String>, fallback: GpsCoordinates) -> Self {
        Self {
            client,
            api_url,
            fallback,
        }
    }

    pub fn fallback(&self) -> GpsCoordinates {
        self.fallback
    }

    /// Fetch the destination from the API
    pub async fn fetch_destination(&self) -> AppResult<GpsCoordinates> {
        let Some(url) = &self.api_url else {
            return Ok(self.fallback);
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Destination API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Destination API error: {}",
                response.status()
            )));
        }

        let data: LatestPosition = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse destination response: {}", e))
        })?;

        Ok(self.resolve(data))
    }

    fn resolve(&self, data: LatestPosition) -> GpsCoordinates {
        GpsCoordinates::new(
            data.latitude.unwrap_or(self.fallback.latitude),
            data.longitude.unwrap_or(self.fallback.longitude),
        )
    }
}

#[async_trait]
impl DestinationSource for DestinationClient {
    async fn destination(&self) -> GpsCoordinates {
        match self.fetch_destination().await {
            Ok(destination) => destination,
            Err(e) => {
                tracing::warn!("Could not fetch destination, using fallback: {}", e);
                self.fallback
            }
        }
    }
}

/// Destination kept current by a background refresher
#[async_trait]
impl DestinationSource for watch::Receiver<GpsCoordinates> {
    async fn destination(&self) -> GpsCoordinates {
        *self.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: Option<&str>) -> DestinationClient {
        DestinationClient::new(
            Client::new(),
            api_url.map(str::to_string),
            GpsCoordinates::new(-26.1222561, 28.0347158),
        )
    }

    #[tokio::test]
    async fn test_without_api_returns_fallback() {
        let c = client(None);
        assert_eq!(c.destination().await, c.fallback());
    }

    #[tokio::test]
    async fn test_unreachable_api_returns_fallback() {
        let c = client(Some("http://127.0.0.1:9/gps/latest"));
        assert_eq!(c.destination().await, c.fallback());
    }

    #[test]
    fn test_partial_payload_fills_from_fallback() {
        let c = client(None);
        let data: LatestPosition = serde_json::from_str(r#"{"latitude": -25.9}"#).unwrap();
        assert_eq!(c.resolve(data), GpsCoordinates::new(-25.9, 28.0347158));
    }

    #[tokio::test]
    async fn test_watch_receiver_reads_latest() {
        let (tx, rx) = watch::channel(GpsCoordinates::new(0.0, 0.0));
        tx.send_replace(GpsCoordinates::new(-26.0, 28.0));
        assert_eq!(rx.destination().await, GpsCoordinates::new(-26.0, 28.0));
    }
}
