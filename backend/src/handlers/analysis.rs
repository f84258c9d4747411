//! HTTP handler for the batch route analysis

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::AnalysisResult;
use validator::Validate;

use super::validate_input;
use crate::error::AppResult;
use crate::services::analysis::{AnalysisRequest, AnalysisService, AnalysisSettings};
use crate::services::readings::ReadingService;
use crate::AppState;

/// Query parameters for an analysis run
#[derive(Debug, Deserialize, Validate)]
pub struct AnalysisQuery {
    #[validate(length(min = 1, max = 128, message = "series_id must be 1 to 128 characters"))]
    pub series_id: Option<String>,
}

/// Forecast the series and select the best route between the configured points
pub async fn run_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Json<AnalysisResult>> {
    validate_input(&query)?;

    let config = &state.config;
    let readings =
        ReadingService::new(state.db.clone()).validated_only(config.analysis_validated_only());

    let service = AnalysisService::new(
        Arc::new(readings),
        state.weather.clone(),
        state.routes.clone(),
        AnalysisSettings {
            horizon: config.forecast.horizon,
            rain_weight: config.forecast.rain_weight,
            thresholds: config.forecast.optimal_thresholds(),
        },
    );

    let request = AnalysisRequest {
        series_id: query
            .series_id
            .unwrap_or_else(|| config.analysis.series_id.clone()),
        origin: config.analysis.origin,
        destination: config.analysis.destination,
    };

    let result = service.run(&request).await?;
    Ok(Json(result))
}
