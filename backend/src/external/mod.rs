//! External collaborators: weather, directions, destination and telemetry
//!
//! Services depend on the traits below so that loops and pipelines can be
//! exercised with in-memory fakes.

pub mod destination;
pub mod directions;
pub mod telemetry;
pub mod weather;

use async_trait::async_trait;
use shared::{CandidateRoute, GpsCoordinates, LiveCondition, Telemetry};

use crate::error::AppResult;
use crate::models::StoredReading;

pub use destination::DestinationClient;
pub use directions::DirectionsClient;
pub use telemetry::LineTelemetry;
pub use weather::WeatherClient;

/// Historical readings, chronological
#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Readings of one series, optionally only those newer than `after_id`.
    /// An empty vector is a valid answer.
    async fn fetch_series(
        &self,
        series_id: &str,
        after_id: Option<i64>,
    ) -> AppResult<Vec<StoredReading>>;
}

/// Current weather at the monitoring point
#[async_trait]
pub trait LiveWeatherSource: Send + Sync {
    /// `None` when the provider could not be reached or answered garbage
    async fn current_conditions(&self, at: GpsCoordinates) -> Option<LiveCondition>;
}

/// Alternative driving routes between two points
#[async_trait]
pub trait RouteSource: Send + Sync {
    /// `Ok(vec![])` when the provider found no route
    async fn alternatives(
        &self,
        origin: GpsCoordinates,
        destination: GpsCoordinates,
    ) -> AppResult<Vec<CandidateRoute>>;
}

/// Live telemetry from the monitoring device
#[async_trait]
pub trait TelemetrySource: Send {
    /// Next parsed sample, or `None` when nothing usable arrived in time
    async fn next_telemetry(&mut self) -> Option<Telemetry>;
}

/// Destination provider for the monitoring loop
#[async_trait]
pub trait DestinationSource: Send + Sync {
    async fn destination(&self) -> GpsCoordinates;
}
