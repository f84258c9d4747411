//! HTTP handlers for stored readings and their validation logs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::validation::ValidationReport;
use validator::Validate;

use super::validate_input;
use crate::error::AppResult;
use crate::models::{InvalidReading, SeriesSummary, StoredReading};
use crate::services::readings::{NewReadingInput, ReadingService};
use crate::AppState;

const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for list endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 1000, message = "limit must be between 1 and 1000"))]
    pub limit: Option<i64>,
}

impl ListQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// A stored reading with the outcome of its validation
#[derive(Debug, Serialize)]
pub struct StoredReadingResponse {
    pub reading: StoredReading,
    pub validation: ValidationReport,
    pub valid: bool,
}

/// List series with reading counts
pub async fn list_series(State(state): State<AppState>) -> AppResult<Json<Vec<SeriesSummary>>> {
    let service = ReadingService::new(state.db);
    let series = service.list_series().await?;
    Ok(Json(series))
}

/// Latest readings of one series
pub async fn list_readings(
    State(state): State<AppState>,
    Path(series_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<StoredReading>>> {
    validate_input(&query)?;

    let service = ReadingService::new(state.db);
    let readings = service.recent(&series_id, query.limit()).await?;
    Ok(Json(readings))
}

/// Store a reading, validate it and log the outcome
pub async fn create_reading(
    State(state): State<AppState>,
    Path(series_id): Path<String>,
    Json(input): Json<NewReadingInput>,
) -> AppResult<(StatusCode, Json<StoredReadingResponse>)> {
    let service = ReadingService::new(state.db);
    let reading = service.insert(&series_id, input).await?;
    let validation = service.validate_and_log(&reading).await?;

    Ok((
        StatusCode::CREATED,
        Json(StoredReadingResponse {
            valid: validation.is_valid(),
            reading,
            validation,
        }),
    ))
}

/// Most recent validation failures
pub async fn list_invalid_readings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<InvalidReading>>> {
    validate_input(&query)?;

    let service = ReadingService::new(state.db);
    let invalid = service.list_invalid(query.limit()).await?;
    Ok(Json(invalid))
}
