//! Route definitions for the Solar Route Planner

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Batch analysis
        .route("/analysis", get(handlers::run_analysis))
        // Live monitoring snapshot
        .route("/sensors", get(handlers::get_sensors))
        .route("/directions", get(handlers::get_directions))
        // Reading store
        .nest("/series", series_routes())
        .route("/readings/invalid", get(handlers::list_invalid_readings))
}

/// Reading series routes
fn series_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_series))
        .route(
            "/:series_id/readings",
            get(handlers::list_readings).post(handlers::create_reading),
        )
}
