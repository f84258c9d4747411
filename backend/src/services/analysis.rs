//! Batch analysis: forecast the series, score alternatives, pick a route

use std::sync::Arc;

use shared::{
    select_best, AnalysisResult, ForecastBlendScorer, Forecaster, GpsCoordinates,
    OptimalThresholds, Reading,
};

use crate::error::AppResult;
use crate::external::{LiveWeatherSource, ReadingSource, RouteSource};

/// Tunables of the batch pipeline
#[derive(Debug, Clone, Copy)]
pub struct AnalysisSettings {
    pub horizon: usize,
    pub rain_weight: f64,
    pub thresholds: OptimalThresholds,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            horizon: shared::DEFAULT_HORIZON,
            rain_weight: shared::DEFAULT_RAIN_WEIGHT,
            thresholds: OptimalThresholds::default(),
        }
    }
}

/// One analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub series_id: String,
    pub origin: GpsCoordinates,
    pub destination: GpsCoordinates,
}

/// Analysis service wiring readings, live weather and routes together
#[derive(Clone)]
pub struct AnalysisService {
    readings: Arc<dyn ReadingSource>,
    weather: Arc<dyn LiveWeatherSource>,
    routes: Arc<dyn RouteSource>,
    settings: AnalysisSettings,
}

impl AnalysisService {
    pub fn new(
        readings: Arc<dyn ReadingSource>,
        weather: Arc<dyn LiveWeatherSource>,
        routes: Arc<dyn RouteSource>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            readings,
            weather,
            routes,
            settings,
        }
    }

    /// Run the pipeline once.
    ///
    /// Only a failing reading store is an error. Missing forecasts, live
    /// weather or routes degrade the result instead.
    pub async fn run(&self, request: &AnalysisRequest) -> AppResult<AnalysisResult> {
        let stored = self.readings.fetch_series(&request.series_id, None).await?;
        let readings: Vec<Reading> = stored.iter().filter_map(|r| r.to_reading()).collect();

        tracing::info!(
            "Analysing series {} with {} readings ({} incomplete skipped)",
            request.series_id,
            readings.len(),
            stored.len() - readings.len()
        );

        let forecast = Forecaster::new(self.settings.horizon).forecast(&readings);
        let live = self.weather.current_conditions(request.origin).await;

        let candidates = match self
            .routes
            .alternatives(request.origin, request.destination)
            .await
        {
            Ok(routes) => routes,
            Err(e) => {
                tracing::warn!("No route alternatives, using placeholder: {}", e);
                Vec::new()
            }
        };

        let scorer =
            ForecastBlendScorer::with_rain_weight(&forecast, live, self.settings.rain_weight);
        if !scorer.has_forecast() {
            tracing::warn!("Forecast unavailable for series {}", request.series_id);
        }

        let selection = select_best(&scorer, &candidates);
        let best = selection.best;

        tracing::info!(
            "Selected route {:?} out of {} (score {:.2})",
            best.route.summary,
            selection.candidates,
            best.score
        );

        Ok(AnalysisResult {
            average_solar: best.solar_avg,
            average_rain: best.rain_avg,
            instructions: best.route.instructions(),
            rain_accuracy: best.rain_accuracy,
            score_accuracy: best.score,
            solar_accuracy: best.solar_accuracy,
            total_distance: best.route.total_distance_text(),
            total_duration: best.route.total_duration_text(),
            optimal: scorer.has_forecast()
                && self
                    .settings
                    .thresholds
                    .is_optimal(best.solar_avg, best.rain_avg),
            placeholder: selection.placeholder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::StoredReading;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use shared::{CandidateRoute, Leg, LiveCondition, Step};

    struct FakeReadings(Vec<StoredReading>);

    #[async_trait]
    impl ReadingSource for FakeReadings {
        async fn fetch_series(
            &self,
            _series_id: &str,
            _after_id: Option<i64>,
        ) -> AppResult<Vec<StoredReading>> {
            Ok(self.0.clone())
        }
    }

    struct FakeWeather(Option<LiveCondition>);

    #[async_trait]
    impl LiveWeatherSource for FakeWeather {
        async fn current_conditions(&self, _at: GpsCoordinates) -> Option<LiveCondition> {
            self.0
        }
    }

    struct FakeRoutes(AppResult<Vec<CandidateRoute>>);

    #[async_trait]
    impl RouteSource for FakeRoutes {
        async fn alternatives(
            &self,
            _origin: GpsCoordinates,
            _destination: GpsCoordinates,
        ) -> AppResult<Vec<CandidateRoute>> {
            match &self.0 {
                Ok(routes) => Ok(routes.clone()),
                Err(e) => Err(AppError::Directions(e.to_string())),
            }
        }
    }

    fn rising_series(n: usize) -> Vec<StoredReading> {
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
        (0..n)
            .map(|i| StoredReading {
                id: i as i64 + 1,
                series_id: "ESP32_data".to_string(),
                recorded_at: start + Duration::minutes(i as i64),
                temperature_c: Some(24.0),
                humidity_percent: Some(40.0),
                pressure_hpa: Some(1010.0),
                rainfall_mm: Some(0.0),
                solar_irradiance_wm2: Some(500.0 + 450.0 * i as f64 / (n - 1) as f64),
                latitude: Some(-25.746111),
                longitude: Some(28.188056),
            })
            .collect()
    }

    fn route(summary: &str, seconds: u64) -> CandidateRoute {
        CandidateRoute {
            summary: summary.to_string(),
            legs: vec![Leg {
                distance_text: "25 km".to_string(),
                duration_text: "22 mins".to_string(),
                duration_seconds: seconds,
                distance_meters: 25_000,
                steps: vec![
                    Step::rich("Head <b>south</b>", "1 km", "2 mins"),
                    Step::rich("Merge onto <b>N1</b>", "24 km", "20 mins"),
                ],
            }],
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            series_id: "ESP32_data".to_string(),
            origin: GpsCoordinates::new(-25.746111, 28.188056),
            destination: GpsCoordinates::new(-25.96, 28.15),
        }
    }

    fn service(
        readings: Vec<StoredReading>,
        live: Option<LiveCondition>,
        routes: AppResult<Vec<CandidateRoute>>,
    ) -> AnalysisService {
        AnalysisService::new(
            Arc::new(FakeReadings(readings)),
            Arc::new(FakeWeather(live)),
            Arc::new(FakeRoutes(routes)),
            AnalysisSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_sunny_dry_series_is_optimal() {
        let svc = service(
            rising_series(20),
            None,
            Ok(vec![route("N1", 1320), route("R21", 1800)]),
        );
        let result = svc.run(&request()).await.unwrap();

        assert!(result.average_solar > 800.0, "solar {}", result.average_solar);
        assert!(result.average_rain.abs() < 1e-6);
        assert!(result.score_accuracy > 0.0);
        assert_eq!(result.rain_accuracy, 100.0);
        assert!(result.optimal);
        assert!(!result.placeholder);
        assert_eq!(result.instructions, vec!["Head south", "Merge onto N1"]);
        assert_eq!(result.total_distance, "25 km");
    }

    #[tokio::test]
    async fn test_equal_scores_keep_first_route() {
        let svc = service(
            rising_series(20),
            None,
            Ok(vec![route("first", 1800), route("second", 900)]),
        );
        let result = svc.run(&request()).await.unwrap();
        // Reward scores ignore the route itself
        assert_eq!(result.total_duration, "22 mins");
        assert!(!result.placeholder);
    }

    #[tokio::test]
    async fn test_live_reading_shifts_averages() {
        let without = service(rising_series(20), None, Ok(vec![route("N1", 1320)]))
            .run(&request())
            .await
            .unwrap();
        let with = service(
            rising_series(20),
            Some(LiveCondition {
                solar_irradiance_wm2: 0.0,
                rainfall_mm: 0.0,
            }),
            Ok(vec![route("N1", 1320)]),
        )
        .run(&request())
        .await
        .unwrap();
        assert!(with.average_solar < without.average_solar);
    }

    #[tokio::test]
    async fn test_provider_failure_yields_placeholder() {
        let svc = service(
            rising_series(20),
            None,
            Err(AppError::Directions("OVER_QUERY_LIMIT".to_string())),
        );
        let result = svc.run(&request()).await.unwrap();
        assert!(result.placeholder);
        assert_eq!(result.instructions, vec![shared::PLACEHOLDER_INSTRUCTION]);
        assert_eq!(result.total_distance, shared::NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_empty_series_scores_zero() {
        let svc = service(Vec::new(), None, Ok(vec![route("N1", 1320)]));
        let result = svc.run(&request()).await.unwrap();
        assert_eq!(result.score_accuracy, 0.0);
        assert_eq!(result.average_solar, 0.0);
        assert_eq!(result.solar_accuracy, 0.0);
        assert!(!result.optimal);
    }

    #[tokio::test]
    async fn test_incomplete_readings_are_skipped() {
        let mut readings = rising_series(20);
        readings[3].solar_irradiance_wm2 = None;
        let result = service(readings, None, Ok(vec![route("N1", 1320)]))
            .run(&request())
            .await
            .unwrap();
        assert!(result.average_solar > 800.0);
    }
}
