//! Line-delimited JSON telemetry from the monitoring device
//!
//! The device writes one JSON object per line:
//! `{"temperature": 24.1, "humidity": 63, "lux": 812, "rain": 0, "latitude": -26.2, "longitude": 28.04}`.
//! Numbers may arrive as strings. Blank, malformed and late lines yield no
//! sample for that tick.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shared::{GpsCoordinates, RainState, Telemetry};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::TelemetrySource;
use crate::error::{AppError, AppResult};

/// Telemetry reader over any buffered byte stream
pub struct LineTelemetry<R> {
    reader: R,
    read_timeout: Duration,
    fallback_position: GpsCoordinates,
    line: String,
}

impl LineTelemetry<BufReader<File>> {
    /// Open a device node or file
    pub async fn open(
        path: &str,
        read_timeout: Duration,
        fallback_position: GpsCoordinates,
    ) -> AppResult<Self> {
        let file = File::open(path)
            .await
            .map_err(|e| AppError::Telemetry(format!("could not open {}: {}", path, e)))?;
        tracing::info!("Opened telemetry source {}", path);
        Ok(Self::new(BufReader::new(file), read_timeout, fallback_position))
    }
}

impl<R> LineTelemetry<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, read_timeout: Duration, fallback_position: GpsCoordinates) -> Self {
        Self {
            reader,
            read_timeout,
            fallback_position,
            line: String::new(),
        }
    }

    /// Read one line; `Ok(None)` on timeout or end of stream
    async fn read_line(&mut self) -> AppResult<Option<&str>> {
        self.line.clear();
        match tokio::time::timeout(self.read_timeout, self.reader.read_line(&mut self.line)).await {
            Err(_) => Ok(None),
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(_)) => Ok(Some(self.line.trim())),
            Ok(Err(e)) => Err(AppError::Telemetry(format!("read failed: {}", e))),
        }
    }
}

#[async_trait]
impl<R> TelemetrySource for LineTelemetry<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_telemetry(&mut self) -> Option<Telemetry> {
        let fallback = self.fallback_position;
        let line = match self.read_line().await {
            Ok(Some(line)) if !line.is_empty() => line,
            Ok(_) => return None,
            Err(e) => {
                tracing::error!("{}", e);
                return None;
            }
        };

        let parsed = parse_telemetry_line(line, fallback);
        if parsed.is_none() {
            tracing::debug!("Skipping malformed telemetry line: {}", line);
        }
        parsed
    }
}

/// Parse one telemetry line; `None` unless it is a JSON object
pub fn parse_telemetry_line(line: &str, fallback_position: GpsCoordinates) -> Option<Telemetry> {
    let value: Value = serde_json::from_str(line).ok()?;
    let object = value.as_object()?;
    let field = |name: &str| object.get(name).and_then(number);

    let rain = field("rain")
        .map(|flag| RainState::from_flag(flag as i64))
        .unwrap_or_default();

    Some(Telemetry {
        temperature_c: field("temperature"),
        humidity_pct: field("humidity"),
        lux: field("lux"),
        rain,
        position: GpsCoordinates::new(
            field("latitude").unwrap_or(fallback_position.latitude),
            field("longitude").unwrap_or(fallback_position.longitude),
        ),
        timestamp: Utc::now(),
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
