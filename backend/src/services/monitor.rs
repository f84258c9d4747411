//! Real-time monitoring loop
//!
//! Each tick reads one telemetry sample, decides through the recalculation
//! policy whether a new route is warranted and, if so, fetches alternatives,
//! scores them with the travel-cost strategy and commits the winner. The
//! latest sensors and route are published as one snapshot per tick.

use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::{
    select_best, CostWeights, GpsCoordinates, MonitorState, RecalcDecision, RecalcPolicy,
    RouteView, SensorsView, StreamingStatus, TravelCostScorer, TriggerState,
};
use tokio::sync::watch;

use crate::external::{DestinationClient, DestinationSource, RouteSource, TelemetrySource};

/// Tunables of the monitoring loop
#[derive(Debug, Clone, Copy)]
pub struct MonitorSettings {
    pub policy: RecalcPolicy,
    pub weights: CostWeights,
    pub max_alternatives: usize,
    pub tick_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            policy: RecalcPolicy::default(),
            weights: CostWeights::default(),
            max_alternatives: 3,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Monitoring loop owning the telemetry source and the monitor state
pub struct Monitor<T> {
    telemetry: T,
    routes: Arc<dyn RouteSource>,
    destination: Arc<dyn DestinationSource>,
    settings: MonitorSettings,
    state: MonitorState,
    status: watch::Sender<StreamingStatus>,
}

impl<T: TelemetrySource> Monitor<T> {
    pub fn new(
        telemetry: T,
        routes: Arc<dyn RouteSource>,
        destination: Arc<dyn DestinationSource>,
        settings: MonitorSettings,
        status: watch::Sender<StreamingStatus>,
    ) -> Self {
        Self {
            telemetry,
            routes,
            destination,
            settings,
            state: MonitorState::new(),
            status,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Process one tick; `None` when no telemetry arrived
    pub async fn tick(&mut self, now: Instant) -> Option<RecalcDecision> {
        let telemetry = self.telemetry.next_telemetry().await?;
        let conditions = telemetry.conditions();
        let origin = telemetry.position;
        let triggers = TriggerState::from_conditions(&conditions, &self.settings.weights);

        let decision = self
            .state
            .evaluate(&self.settings.policy, origin, triggers, now);
        tracing::debug!(
            moved = decision.moved,
            triggers_changed = decision.triggers_changed,
            time_ok = decision.time_ok,
            "Evaluated telemetry at {}",
            origin
        );

        if decision.should_recompute() {
            let scorer = TravelCostScorer::new(conditions, self.settings.weights);
            let view = self.recompute(origin, triggers, scorer).await;
            self.state.commit(now, origin, triggers, view);
        }

        self.status.send_replace(StreamingStatus {
            sensors: SensorsView::from(&telemetry),
            route: self.state.current_route().clone(),
        });

        Some(decision)
    }

    async fn recompute(
        &self,
        origin: GpsCoordinates,
        triggers: TriggerState,
        scorer: TravelCostScorer,
    ) -> RouteView {
        let destination = self.destination.destination().await;
        tracing::info!("Fetching route alternatives {} -> {}", origin, destination);

        let mut candidates = match self.routes.alternatives(origin, destination).await {
            Ok(routes) => routes,
            Err(e) => {
                tracing::warn!("Route alternatives unavailable: {}", e);
                Vec::new()
            }
        };
        candidates.truncate(self.settings.max_alternatives);

        let selection = select_best(&scorer, &candidates);
        let status = triggers.status();
        tracing::info!(
            "Route recomputed ({}): {} candidates, cost {:.1}",
            status,
            selection.candidates,
            selection.best.score
        );

        let route = &selection.best.route;
        RouteView {
            status,
            estimated_time: if selection.placeholder {
                None
            } else {
                Some(route.total_duration_text())
            },
            steps: route.rendered_steps(),
        }
    }

    /// Tick until shutdown is signalled
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Monitoring loop started");
        loop {
            self.tick(Instant::now()).await;

            tokio::select! {
                _ = tokio::time::sleep(self.settings.tick_interval) => {}
                _ = shutdown.changed() => break,
            }
        }
        tracing::info!("Monitoring loop stopped");
    }
}

/// Poll the destination API and publish each answer
pub async fn run_destination_refresher(
    client: DestinationClient,
    destination: watch::Sender<GpsCoordinates>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let latest = client.destination().await;
        if *destination.borrow() != latest {
            tracing::info!("Destination refreshed: {}", latest);
        }
        destination.send_replace(latest);

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = shutdown.changed() => break,
        }
    }
}
