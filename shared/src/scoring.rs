//! Route scoring strategies
//!
//! Two strategies share the [`RouteScorer`] interface and deliberately use
//! opposite sign conventions:
//!
//! - [`ForecastBlendScorer`] rewards forecast sunshine and penalises forecast
//!   rain. Higher is better.
//! - [`TravelCostScorer`] starts from travel time and adds penalties for the
//!   live sensor conditions. Lower is better.
//!
//! Each strategy declares its [`Objective`] so the selector never has to
//! guess which direction wins.

use serde::{Deserialize, Serialize};

use crate::models::{CandidateRoute, LiveCondition, SensorConditions, WeatherForecast};

/// Weight applied to mean forecast rainfall in the reward score
pub const DEFAULT_RAIN_WEIGHT: f64 = 100.0;

/// Instruction keywords marking fast but exposed roads
pub const HIGHWAY_KEYWORDS: &[&str] = &[
    "merge", "motorway", "freeway", "m1", "m2", "highway", "fwy", "ramp",
];

/// Direction in which a score improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Maximize,
    Minimize,
}

impl Objective {
    /// True when `candidate` strictly beats `best`
    pub fn is_better(&self, candidate: f64, best: f64) -> bool {
        match self {
            Objective::Maximize => candidate > best,
            Objective::Minimize => candidate < best,
        }
    }
}

/// Score of one route with its diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteScore {
    pub score: f64,
    pub solar_avg: f64,
    pub rain_avg: f64,
    pub solar_accuracy: f64,
    pub rain_accuracy: f64,
}

/// A route paired with its score, recomputed on every pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    pub route: CandidateRoute,
    pub score: f64,
    pub solar_avg: f64,
    pub rain_avg: f64,
    pub solar_accuracy: f64,
    pub rain_accuracy: f64,
}

impl ScoredRoute {
    pub fn new(route: CandidateRoute, score: RouteScore) -> Self {
        Self {
            route,
            score: score.score,
            solar_avg: score.solar_avg,
            rain_avg: score.rain_avg,
            solar_accuracy: score.solar_accuracy,
            rain_accuracy: score.rain_accuracy,
        }
    }
}

/// A route scoring strategy
pub trait RouteScorer {
    fn objective(&self) -> Objective;

    fn score(&self, route: &CandidateRoute) -> RouteScore;
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Reward-mode scorer fusing forecast signals with a live reading.
///
/// The score only depends on the environment, so every candidate of one pass
/// receives the same value and the selector keeps the first.
#[derive(Debug, Clone)]
pub struct ForecastBlendScorer {
    blended: Option<RouteScore>,
}

impl ForecastBlendScorer {
    pub fn new(forecast: &WeatherForecast, live: Option<LiveCondition>) -> Self {
        Self::with_rain_weight(forecast, live, DEFAULT_RAIN_WEIGHT)
    }

    pub fn with_rain_weight(
        forecast: &WeatherForecast,
        live: Option<LiveCondition>,
        rain_weight: f64,
    ) -> Self {
        let blended = match (&forecast.solar.forecast, &forecast.rain.forecast) {
            (Some(solar), Some(rain)) => {
                let mut solar = solar.clone();
                let mut rain = rain.clone();
                if let Some(live) = live {
                    solar.push(live.solar_irradiance_wm2);
                    rain.push(live.rainfall_mm);
                }

                let solar_avg = mean(&solar);
                let rain_avg = mean(&rain);
                Some(RouteScore {
                    score: solar_avg - rain_weight * rain_avg,
                    solar_avg,
                    rain_avg,
                    solar_accuracy: forecast.solar.accuracy_pct,
                    rain_accuracy: forecast.rain.accuracy_pct,
                })
            }
            _ => None,
        };

        Self { blended }
    }

    /// False when the forecast could not be produced and scores are zero
    pub fn has_forecast(&self) -> bool {
        self.blended.is_some()
    }
}

impl RouteScorer for ForecastBlendScorer {
    fn objective(&self) -> Objective {
        Objective::Maximize
    }

    fn score(&self, _route: &CandidateRoute) -> RouteScore {
        self.blended.unwrap_or_default()
    }
}

/// Penalties and thresholds for the cost-mode scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Seconds added per highway step while wet
    pub highway_penalty_seconds: f64,
    /// Fraction of travel time added in low light
    pub low_light_factor: f64,
    /// Seconds added at high humidity
    pub humidity_penalty_seconds: f64,
    pub humidity_threshold_pct: f64,
    pub light_threshold_lux: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            highway_penalty_seconds: 30.0,
            low_light_factor: 0.10,
            humidity_penalty_seconds: 20.0,
            humidity_threshold_pct: 80.0,
            light_threshold_lux: 300.0,
        }
    }
}

impl CostWeights {
    pub fn is_humid(&self, conditions: &SensorConditions) -> bool {
        conditions
            .humidity_pct
            .map(|h| h >= self.humidity_threshold_pct)
            .unwrap_or(false)
    }

    pub fn is_dim(&self, conditions: &SensorConditions) -> bool {
        conditions
            .lux
            .map(|l| l <= self.light_threshold_lux)
            .unwrap_or(false)
    }
}

/// True when an instruction mentions a highway keyword
pub fn mentions_highway(instruction: &str) -> bool {
    let lower = instruction.to_lowercase();
    HIGHWAY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Cost-mode scorer: travel time plus live-condition penalties
#[derive(Debug, Clone, Copy)]
pub struct TravelCostScorer {
    conditions: SensorConditions,
    weights: CostWeights,
}

impl TravelCostScorer {
    pub fn new(conditions: SensorConditions, weights: CostWeights) -> Self {
        Self {
            conditions,
            weights,
        }
    }
}

impl RouteScorer for TravelCostScorer {
    fn objective(&self) -> Objective {
        Objective::Minimize
    }

    fn score(&self, route: &CandidateRoute) -> RouteScore {
        let duration = route.duration_seconds() as f64;
        let mut cost = duration;

        if self.conditions.rain.is_wet() {
            let exposed = route
                .steps()
                .filter(|s| mentions_highway(s.instruction()))
                .count();
            cost += exposed as f64 * self.weights.highway_penalty_seconds;
        }

        if self.weights.is_dim(&self.conditions) {
            cost += duration * self.weights.low_light_factor;
        }

        if self.weights.is_humid(&self.conditions) {
            cost += self.weights.humidity_penalty_seconds;
        }

        RouteScore {
            score: cost,
            ..RouteScore::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Leg, RainState, SignalForecast, Step};

    fn route(duration: u64, instructions: &[&str]) -> CandidateRoute {
        CandidateRoute::new(vec![Leg {
            distance_text: "10 km".to_string(),
            duration_text: "10 mins".to_string(),
            duration_seconds: duration,
            distance_meters: 10_000,
            steps: instructions
                .iter()
                .map(|i| Step::rich(*i, "1 km", "1 min"))
                .collect(),
        }])
    }

    fn forecast(solar: Vec<f64>, rain: Vec<f64>) -> WeatherForecast {
        WeatherForecast {
            solar: SignalForecast {
                forecast: Some(solar),
                accuracy_pct: 95.0,
            },
            rain: SignalForecast {
                forecast: Some(rain),
                accuracy_pct: 100.0,
            },
        }
    }

    #[test]
    fn test_objective_comparators() {
        assert!(Objective::Maximize.is_better(2.0, 1.0));
        assert!(!Objective::Maximize.is_better(1.0, 1.0));
        assert!(Objective::Minimize.is_better(1.0, 2.0));
        assert!(!Objective::Minimize.is_better(2.0, 2.0));
    }

    #[test]
    fn test_blend_appends_live_reading() {
        let f = forecast(vec![900.0, 900.0, 900.0], vec![0.0, 0.0, 0.0]);
        let live = LiveCondition {
            solar_irradiance_wm2: 500.0,
            rainfall_mm: 0.4,
        };
        let s = ForecastBlendScorer::new(&f, Some(live)).score(&route(60, &[]));
        assert!((s.solar_avg - 800.0).abs() < 1e-9);
        assert!((s.rain_avg - 0.1).abs() < 1e-9);
        assert!((s.score - (800.0 - 10.0)).abs() < 1e-9);
        assert_eq!(s.solar_accuracy, 95.0);
    }

    #[test]
    fn test_blend_custom_rain_weight() {
        let f = forecast(vec![900.0], vec![1.0]);
        let s = ForecastBlendScorer::with_rain_weight(&f, None, 10.0).score(&route(60, &[]));
        assert!((s.score - 890.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_without_forecast_scores_zero() {
        let f = WeatherForecast {
            solar: SignalForecast::unavailable(),
            rain: SignalForecast::unavailable(),
        };
        let scorer = ForecastBlendScorer::new(&f, None);
        assert!(!scorer.has_forecast());
        assert_eq!(scorer.score(&route(60, &[])), RouteScore::default());
    }

    #[test]
    fn test_cost_low_light_is_proportional() {
        let conditions = SensorConditions {
            humidity_pct: Some(40.0),
            lux: Some(120.0),
            rain: RainState::Dry,
        };
        let s = TravelCostScorer::new(conditions, CostWeights::default()).score(&route(600, &[]));
        assert!((s.score - 660.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_humidity_penalty() {
        let conditions = SensorConditions {
            humidity_pct: Some(80.0),
            lux: Some(900.0),
            rain: RainState::Dry,
        };
        let s = TravelCostScorer::new(conditions, CostWeights::default()).score(&route(600, &[]));
        assert!((s.score - 620.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_missing_sensors_add_nothing() {
        let s = TravelCostScorer::new(SensorConditions::default(), CostWeights::default())
            .score(&route(600, &["Merge onto <b>M1</b>"]));
        assert_eq!(s.score, 600.0);
    }

    #[test]
    fn test_highway_keyword_detection() {
        assert!(mentions_highway("Take the <b>ramp</b> to N1"));
        assert!(mentions_highway("Merge onto FREEWAY"));
        assert!(!mentions_highway("Turn left onto Church St"));
    }
}
