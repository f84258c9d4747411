//! Solar Route Planner - Backend Server
//!
//! Forecasts solar irradiance and rainfall from sensor readings, scores
//! alternative driving routes against forecast and live conditions, and keeps
//! the best route current while a vehicle moves.

use axum::{routing::get, Router};
use shared::StreamingStatus;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::watch;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use external::{
    DestinationClient, DirectionsClient, LineTelemetry, LiveWeatherSource, RouteSource,
    WeatherClient,
};
use services::monitor::{run_destination_refresher, MonitorSettings};
use services::{IngestService, Monitor, ReadingService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub weather: Arc<dyn LiveWeatherSource>,
    pub routes: Arc<dyn RouteSource>,
    /// Latest snapshot published by the monitoring loop
    pub monitor: watch::Receiver<StreamingStatus>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srp_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Solar Route Planner Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Forecast horizon: {} steps, rain weight: {}",
        config.forecast.horizon,
        config.forecast.rain_weight
    );

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Outbound HTTP clients share one connection pool and timeout
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let weather = Arc::new(WeatherClient::with_base_url(
        http.clone(),
        config.weather.api_key.clone(),
        config.weather.api_endpoint.clone(),
    ));
    let directions = Arc::new(DirectionsClient::with_base_url(
        http.clone(),
        config.directions.api_key.clone(),
        config.directions.api_endpoint.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (status_tx, status_rx) = watch::channel(StreamingStatus::default());
    let mut background = Vec::new();

    if config.monitor.enabled {
        let monitor_config = &config.monitor;
        let destination_client = DestinationClient::new(
            http.clone(),
            monitor_config.destination_api_url.clone(),
            monitor_config.destination,
        );
        let (destination_tx, destination_rx) = watch::channel(monitor_config.destination);
        background.push(tokio::spawn(run_destination_refresher(
            destination_client,
            destination_tx,
            Duration::from_secs(monitor_config.destination_refresh_seconds),
            shutdown_rx.clone(),
        )));

        let telemetry = LineTelemetry::open(
            &monitor_config.telemetry_path,
            monitor_config.read_timeout(),
            monitor_config.fallback_position,
        )
        .await?;

        let monitor = Monitor::new(
            telemetry,
            directions.clone(),
            Arc::new(destination_rx),
            MonitorSettings {
                policy: monitor_config.recalc_policy(),
                weights: monitor_config.cost_weights(),
                max_alternatives: monitor_config.max_alternatives,
                tick_interval: monitor_config.tick_interval(),
            },
            status_tx,
        );
        background.push(tokio::spawn(monitor.run(shutdown_rx.clone())));
    }

    if config.ingest.enabled {
        let store = Arc::new(ReadingService::new(db_pool.clone()));
        let ingest = IngestService::new(store.clone(), store, config.ingest.series_id.clone());
        background.push(tokio::spawn(ingest.run(
            Duration::from_secs(config.ingest.poll_seconds),
            shutdown_rx.clone(),
        )));
    }

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        weather,
        routes: directions,
        monitor: status_rx,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background loops and release the telemetry device
    shutdown_tx.send_replace(true);
    for task in background {
        if let Err(e) = task.await {
            tracing::error!("Background task failed: {}", e);
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Solar Route Planner API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
