//! Directions API client for alternative driving routes
//!
//! Integrates with the Google Directions API (`alternatives=true`,
//! `mode=driving`) and converts its payload into candidate routes.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{CandidateRoute, GpsCoordinates, Leg, Step};

use super::RouteSource;
use crate::error::{AppError, AppResult};

/// Directions API client
#[derive(Clone)]
pub struct DirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Google Directions API response
#[derive(Debug, Deserialize)]
struct GDirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<GRoute>,
}

#[derive(Debug, Deserialize)]
struct GRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    legs: Vec<GLeg>,
}

#[derive(Debug, Deserialize)]
struct GLeg {
    distance: Option<GTextValue>,
    duration: Option<GTextValue>,
    #[serde(default)]
    steps: Vec<GStep>,
}

#[derive(Debug, Deserialize)]
struct GStep {
    #[serde(default)]
    html_instructions: String,
    distance: Option<GTextValue>,
    duration: Option<GTextValue>,
}

#[derive(Debug, Deserialize)]
struct GTextValue {
    #[serde(default)]
    text: String,
    #[serde(default)]
    value: u64,
}

impl DirectionsClient {
    /// Create a new DirectionsClient on a shared HTTP client
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(
            client,
            api_key,
            "https://maps.googleapis.com/maps/api/directions/json".to_string(),
        )
    }

    /// Create a new DirectionsClient with custom base URL
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch alternative routes from origin to destination
    pub async fn get_routes(
        &self,
        origin: GpsCoordinates,
        destination: GpsCoordinates,
    ) -> AppResult<Vec<CandidateRoute>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin.as_query_value()),
                ("destination", destination.as_query_value()),
                ("alternatives", "true".to_string()),
                ("mode", "driving".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Directions(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Directions(format!("{} - {}", status, body)));
        }

        let data: GDirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Directions(format!("malformed response: {}", e)))?;

        convert_directions_response(data)
    }
}

/// Convert a Google Directions payload into candidate routes.
///
/// `ZERO_RESULTS` is a successful answer with no routes.
fn convert_directions_response(data: GDirectionsResponse) -> AppResult<Vec<CandidateRoute>> {
    match data.status.as_str() {
        "OK" => Ok(data.routes.into_iter().map(convert_route).collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        other => Err(AppError::Directions(match data.error_message {
            Some(msg) => format!("{}: {}", other, msg),
            None => other.to_string(),
        })),
    }
}

fn convert_route(route: GRoute) -> CandidateRoute {
    CandidateRoute {
        summary: route.summary,
        legs: route.legs.into_iter().map(convert_leg).collect(),
    }
}

fn convert_leg(leg: GLeg) -> Leg {
    let (distance_text, distance_meters) = text_value(leg.distance);
    let (duration_text, duration_seconds) = text_value(leg.duration);

    Leg {
        distance_text,
        duration_text,
        duration_seconds,
        distance_meters,
        steps: leg.steps.into_iter().map(convert_step).collect(),
    }
}

fn convert_step(step: GStep) -> Step {
    match (step.distance, step.duration) {
        (Some(distance), Some(duration)) => {
            Step::rich(step.html_instructions, distance.text, duration.text)
        }
        _ => Step::plain(shared::strip_html(&step.html_instructions)),
    }
}

fn text_value(field: Option<GTextValue>) -> (String, u64) {
    field
        .map(|f| (f.text, f.value))
        .unwrap_or_else(|| (shared::NOT_AVAILABLE.to_string(), 0))
}

#[async_trait]
impl RouteSource for DirectionsClient {
    async fn alternatives(
        &self,
        origin: GpsCoordinates,
        destination: GpsCoordinates,
    ) -> AppResult<Vec<CandidateRoute>> {
        self.get_routes(origin, destination).await
    }
}
