//! Recalculation policy for continuous monitoring
//!
//! On every telemetry tick the monitor moves `Idle → Evaluating`, decides
//! whether the new position or sensor triggers justify a fresh route, and
//! either returns to `Idle` or passes through `Recomputing` first.
//!
//! A recompute happens iff `(moved || triggers_changed) && time_ok`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::models::{RouteStatus, RouteView, SensorConditions};
use crate::scoring::CostWeights;
use crate::types::GpsCoordinates;

/// Default distance that counts as having moved
pub const DEFAULT_MIN_MOVE_METERS: f64 = 25.0;

/// Default debounce between two recomputations
pub const DEFAULT_MIN_RECALC_INTERVAL: Duration = Duration::from_secs(10);

/// Which environmental triggers are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerState {
    pub raining: bool,
    pub humid: bool,
    pub dim: bool,
}

impl TriggerState {
    pub fn from_conditions(conditions: &SensorConditions, weights: &CostWeights) -> Self {
        Self {
            raining: conditions.rain.is_wet(),
            humid: weights.is_humid(conditions),
            dim: weights.is_dim(conditions),
        }
    }

    /// Status label; rain outranks humidity, humidity outranks light
    pub fn status(&self) -> RouteStatus {
        if self.raining {
            RouteStatus::OptimizedForRain
        } else if self.humid {
            RouteStatus::OptimizedForHumidity
        } else if self.dim {
            RouteStatus::OptimizedForLowLight
        } else {
            RouteStatus::Normal
        }
    }
}

/// Monitor lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    #[default]
    Idle,
    Evaluating,
    Recomputing,
}

/// Inputs behind a recompute decision, kept for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalcDecision {
    pub moved: bool,
    pub triggers_changed: bool,
    pub time_ok: bool,
}

impl RecalcDecision {
    pub fn should_recompute(&self) -> bool {
        (self.moved || self.triggers_changed) && self.time_ok
    }
}

/// Movement threshold and debounce interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalcPolicy {
    pub min_move_meters: f64,
    pub min_interval: Duration,
}

impl Default for RecalcPolicy {
    fn default() -> Self {
        Self {
            min_move_meters: DEFAULT_MIN_MOVE_METERS,
            min_interval: DEFAULT_MIN_RECALC_INTERVAL,
        }
    }
}

impl RecalcPolicy {
    pub fn decide(
        &self,
        state: &MonitorState,
        origin: GpsCoordinates,
        triggers: TriggerState,
        now: Instant,
    ) -> RecalcDecision {
        let moved = state
            .last_origin
            .map(|last| origin.distance_meters(&last) >= self.min_move_meters)
            .unwrap_or(true);

        let triggers_changed = state.last_trigger_state != Some(triggers);

        let time_ok = state
            .last_fetch_time
            .map(|last| now.saturating_duration_since(last) >= self.min_interval)
            .unwrap_or(true);

        RecalcDecision {
            moved,
            triggers_changed,
            time_ok,
        }
    }
}

/// Long-lived monitor state, owned by the monitoring loop
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorState {
    last_fetch_time: Option<Instant>,
    last_origin: Option<GpsCoordinates>,
    last_trigger_state: Option<TriggerState>,
    current_route: RouteView,
    phase: MonitorPhase,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fetch_time(&self) -> Option<Instant> {
        self.last_fetch_time
    }

    pub fn last_origin(&self) -> Option<GpsCoordinates> {
        self.last_origin
    }

    pub fn last_trigger_state(&self) -> Option<TriggerState> {
        self.last_trigger_state
    }

    pub fn current_route(&self) -> &RouteView {
        &self.current_route
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Evaluate one tick and move to `Recomputing` or back to `Idle`
    pub fn evaluate(
        &mut self,
        policy: &RecalcPolicy,
        origin: GpsCoordinates,
        triggers: TriggerState,
        now: Instant,
    ) -> RecalcDecision {
        self.phase = MonitorPhase::Evaluating;
        let decision = policy.decide(self, origin, triggers, now);
        self.phase = if decision.should_recompute() {
            MonitorPhase::Recomputing
        } else {
            MonitorPhase::Idle
        };
        decision
    }

    /// Install a completed selection as one new state record.
    ///
    /// The fetch time never moves backwards.
    pub fn commit(
        &mut self,
        now: Instant,
        origin: GpsCoordinates,
        triggers: TriggerState,
        route: RouteView,
    ) {
        let last_fetch_time = match self.last_fetch_time {
            Some(previous) if previous > now => previous,
            _ => now,
        };

        *self = MonitorState {
            last_fetch_time: Some(last_fetch_time),
            last_origin: Some(origin),
            last_trigger_state: Some(triggers),
            current_route: route,
            phase: MonitorPhase::Idle,
        };
    }
}
