//! Ingest loop: validate newly stored readings and log the outcome

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared::validation::{validate_reading, ValidationReport};
use tokio::sync::watch;

use crate::error::AppResult;
use crate::external::ReadingSource;
use crate::models::StoredReading;

/// Destination of validation outcomes
#[async_trait]
pub trait ValidationSink: Send + Sync {
    async fn record(&self, reading: &StoredReading, report: &ValidationReport) -> AppResult<()>;
}

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub fetched: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Polls one series and validates every reading exactly once
pub struct IngestService {
    source: Arc<dyn ReadingSource>,
    sink: Arc<dyn ValidationSink>,
    series_id: String,
    last_id: Option<i64>,
}

impl IngestService {
    pub fn new(
        source: Arc<dyn ReadingSource>,
        sink: Arc<dyn ValidationSink>,
        series_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            sink,
            series_id: series_id.into(),
            last_id: None,
        }
    }

    pub fn last_id(&self) -> Option<i64> {
        self.last_id
    }

    /// Validate readings newer than the last one seen.
    ///
    /// Readings are handled in id order and the cursor only advances past
    /// readings whose outcome was recorded, so a failing sink retries them on
    /// the next poll.
    pub async fn poll_once(&mut self) -> AppResult<IngestSummary> {
        let mut readings = self.source.fetch_series(&self.series_id, self.last_id).await?;
        // Series come back in time order; the cursor needs id order
        readings.sort_by_key(|r| r.id);
        let mut summary = IngestSummary {
            fetched: readings.len(),
            ..IngestSummary::default()
        };

        for reading in &readings {
            let report = validate_reading(&reading.fields());
            self.sink.record(reading, &report).await?;

            if report.is_valid() {
                summary.valid += 1;
            } else {
                tracing::warn!(
                    reading_id = reading.id,
                    "Invalid reading: {:?}",
                    report.errors()
                );
                summary.invalid += 1;
            }

            self.last_id = Some(reading.id);
        }

        Ok(summary)
    }

    /// Poll until shutdown is signalled; failures are logged and retried
    pub async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Ingest loop started for series {}", self.series_id);
        loop {
            match self.poll_once().await {
                Ok(summary) if summary.fetched > 0 => tracing::info!(
                    "Validated {} readings ({} valid, {} invalid)",
                    summary.fetched,
                    summary.valid,
                    summary.invalid
                ),
                Ok(_) => {}
                Err(e) => tracing::error!("Ingest poll failed: {}", e),
            }

            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = shutdown.changed() => break,
            }
        }
        tracing::info!("Ingest loop stopped");
    }
}
