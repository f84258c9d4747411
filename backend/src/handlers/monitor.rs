//! HTTP handlers for the live monitoring snapshot

use axum::{extract::State, Json};
use shared::{RouteView, StreamingStatus};

use crate::AppState;

/// Latest sensors together with the current route
pub async fn get_sensors(State(state): State<AppState>) -> Json<StreamingStatus> {
    Json(state.monitor.borrow().clone())
}

/// Current route directions only
pub async fn get_directions(State(state): State<AppState>) -> Json<RouteView> {
    Json(state.monitor.borrow().route.clone())
}
