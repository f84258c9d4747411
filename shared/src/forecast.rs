//! Short-horizon forecasting of environmental signals
//!
//! Each signal is modelled independently with an ARIMA(1,1,1) process:
//!
//! ```text
//! Δy[t] = φ·Δy[t-1] + θ·e[t-1] + e[t]
//! ```
//!
//! There is no constant term once the series has been differenced. The
//! coefficients are estimated by minimising the conditional sum of squared
//! one-step errors inside the stationary and invertible region (|φ| < 1,
//! |θ| < 1): a coarse grid locates the basin, a shrinking pattern search
//! polishes the estimate.
//!
//! Accuracy is reported as `100 - MAPE` of the one-step in-sample
//! predictions, clipped to [0, 100].

use tracing::warn;

use crate::error::ForecastError;
use crate::models::{Reading, SignalForecast, SignalKind, WeatherForecast};

/// Default number of future steps to forecast
pub const DEFAULT_HORIZON: usize = 15;

/// Added to actual values when computing percentage errors
pub const MAPE_EPSILON: f64 = 1e-5;

/// Fewer samples than this cannot give a meaningful rain accuracy
pub const MIN_ACCURACY_SAMPLES: usize = 5;

/// Rain series whose maximum stays below this are treated as noise-free
pub const RAIN_VARIANCE_FLOOR_MM: f64 = 0.1;

const PARAM_BOUND: f64 = 0.99;
const GRID_STEPS: usize = 39;
const GRID_START: f64 = -0.95;
const GRID_SPACING: f64 = 0.05;
const REFINE_MAX_ITERATIONS: usize = 200;
const REFINE_MIN_STEP: f64 = 1e-6;

/// Fitted ARIMA(1,1,1) model
#[derive(Debug, Clone)]
pub struct Arima111 {
    phi: f64,
    theta: f64,
    last_level: f64,
    last_diff: f64,
    last_residual: f64,
    in_sample: Vec<f64>,
}

impl Arima111 {
    /// One difference needs two points, the AR term one more
    pub const MIN_POINTS: usize = 3;

    /// Fit the model to a chronologically ordered series
    pub fn fit(series: &[f64]) -> Result<Self, ForecastError> {
        if series.len() < Self::MIN_POINTS {
            return Err(ForecastError::InsufficientData {
                required: Self::MIN_POINTS,
                actual: series.len(),
            });
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteData);
        }

        let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
        let (phi, theta) = estimate_coefficients(&diffs)?;

        // One-step predictions on the differenced scale; the first difference
        // has no history and is predicted as zero.
        let mut predicted_diffs = Vec::with_capacity(diffs.len());
        let mut residual = 0.0;
        for t in 0..diffs.len() {
            let prediction = if t == 0 {
                0.0
            } else {
                phi * diffs[t - 1] + theta * residual
            };
            residual = diffs[t] - prediction;
            predicted_diffs.push(prediction);
        }

        let in_sample = series
            .iter()
            .zip(predicted_diffs.iter())
            .map(|(level, diff)| level + diff)
            .collect();

        Ok(Self {
            phi,
            theta,
            last_level: series[series.len() - 1],
            last_diff: diffs[diffs.len() - 1],
            last_residual: residual,
            in_sample,
        })
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// One-step-ahead predictions for `series[1..]`
    pub fn in_sample_predictions(&self) -> &[f64] {
        &self.in_sample
    }

    /// Forecast the next `steps` levels
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(steps);
        let mut level = self.last_level;
        let mut diff = 0.0;

        for step in 0..steps {
            diff = if step == 0 {
                self.phi * self.last_diff + self.theta * self.last_residual
            } else {
                // Future shocks are zero, so only the AR term carries forward
                self.phi * diff
            };
            level += diff;
            out.push(level);
        }

        out
    }
}

/// Conditional sum of squares of one-step errors on the differenced series
fn conditional_sum_of_squares(diffs: &[f64], phi: f64, theta: f64) -> f64 {
    let mut residual = diffs[0];
    let mut sum = 0.0;
    for t in 1..diffs.len() {
        let e = diffs[t] - (phi * diffs[t - 1] + theta * residual);
        sum += e * e;
        residual = e;
    }
    sum
}

fn estimate_coefficients(diffs: &[f64]) -> Result<(f64, f64), ForecastError> {
    let mut best = (0.0, 0.0);
    let mut best_ss = f64::INFINITY;

    for i in 0..GRID_STEPS {
        let phi = GRID_START + GRID_SPACING * i as f64;
        for j in 0..GRID_STEPS {
            let theta = GRID_START + GRID_SPACING * j as f64;
            let ss = conditional_sum_of_squares(diffs, phi, theta);
            if ss < best_ss {
                best_ss = ss;
                best = (phi, theta);
            }
        }
    }

    if !best_ss.is_finite() {
        return Err(ForecastError::NonConvergence(
            "sum of squares is not finite on the parameter grid".to_string(),
        ));
    }

    let mut step = GRID_SPACING / 2.0;
    for _ in 0..REFINE_MAX_ITERATIONS {
        if step < REFINE_MIN_STEP {
            break;
        }

        let (phi, theta) = best;
        let candidates = [
            (phi + step, theta),
            (phi - step, theta),
            (phi, theta + step),
            (phi, theta - step),
        ];

        let mut improved = false;
        for (p, q) in candidates {
            if p.abs() >= PARAM_BOUND || q.abs() >= PARAM_BOUND {
                continue;
            }
            let ss = conditional_sum_of_squares(diffs, p, q);
            if ss < best_ss {
                best_ss = ss;
                best = (p, q);
                improved = true;
            }
        }

        if !improved {
            step /= 2.0;
        }
    }

    Ok(best)
}

/// Mean absolute percentage error of `predicted` against `actual`
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| ((a - p) / (a + MAPE_EPSILON)).abs())
        .sum();
    total / n as f64 * 100.0
}

/// Convert a MAPE into an accuracy percentage in [0, 100]
pub fn accuracy_from_mape(mape: f64) -> f64 {
    if !mape.is_finite() {
        return 0.0;
    }
    (100.0 - mape).clamp(0.0, 100.0)
}

/// Rain series too short or too flat to evaluate error against
pub fn is_degenerate_rain(series: &[f64]) -> bool {
    series.len() < MIN_ACCURACY_SAMPLES
        || series.iter().cloned().fold(f64::NEG_INFINITY, f64::max) < RAIN_VARIANCE_FLOOR_MM
}

/// Produces per-signal forecasts from historical readings
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    horizon: usize,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON)
    }
}

impl Forecaster {
    pub fn new(horizon: usize) -> Self {
        Self { horizon }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast solar irradiance and rainfall from one batch of readings
    pub fn forecast(&self, readings: &[Reading]) -> WeatherForecast {
        let solar: Vec<f64> = readings.iter().map(|r| r.solar_irradiance_wm2).collect();
        let rain: Vec<f64> = readings.iter().map(|r| r.rainfall_mm).collect();

        WeatherForecast {
            solar: self.forecast_signal(&solar, SignalKind::Solar),
            rain: self.forecast_signal(&rain, SignalKind::Rain),
        }
    }

    /// Forecast one signal and estimate its in-sample accuracy
    pub fn forecast_signal(&self, series: &[f64], kind: SignalKind) -> SignalForecast {
        let degenerate = kind == SignalKind::Rain && is_degenerate_rain(series);

        match Arima111::fit(series) {
            Ok(model) => {
                let accuracy_pct = if degenerate {
                    100.0
                } else {
                    let mape = mean_absolute_percentage_error(
                        &series[1..],
                        model.in_sample_predictions(),
                    );
                    accuracy_from_mape(mape)
                };

                SignalForecast {
                    forecast: Some(model.forecast(self.horizon)),
                    accuracy_pct,
                }
            }
            Err(e) => {
                warn!(signal = ?kind, points = series.len(), "ARIMA fitting failed: {}", e);
                SignalForecast {
                    forecast: None,
                    accuracy_pct: if degenerate { 100.0 } else { 0.0 },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rejects_short_series() {
        let err = Arima111::fit(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_fit_rejects_nan() {
        let err = Arima111::fit(&[1.0, f64::NAN, 3.0, 4.0]).unwrap_err();
        assert_eq!(err, ForecastError::NonFiniteData);
    }

    #[test]
    fn test_coefficients_stay_in_bounds() {
        let series: Vec<f64> = (0..30).map(|i| (i as f64 * 0.7).sin() * 50.0 + 400.0).collect();
        let model = Arima111::fit(&series).unwrap();
        assert!(model.phi().abs() < 1.0);
        assert!(model.theta().abs() < 1.0);
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let series = vec![420.0; 12];
        let model = Arima111::fit(&series).unwrap();
        for v in model.forecast(5) {
            assert!((v - 420.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_trend_continues_upwards() {
        let series: Vec<f64> = (0..20).map(|i| 100.0 + 10.0 * i as f64).collect();
        let model = Arima111::fit(&series).unwrap();
        let forecast = model.forecast(3);
        assert!(forecast[0] > 290.0);
        assert!(forecast[1] > forecast[0]);
    }

    #[test]
    fn test_in_sample_alignment() {
        let series = vec![1.0, 2.0, 4.0, 7.0, 11.0];
        let model = Arima111::fit(&series).unwrap();
        assert_eq!(model.in_sample_predictions().len(), series.len() - 1);
        // First prediction has no differenced history: it repeats the first level
        assert_eq!(model.in_sample_predictions()[0], 1.0);
    }

    #[test]
    fn test_forecast_horizon_length() {
        let forecaster = Forecaster::new(10);
        let series: Vec<f64> = (0..8).map(|i| 500.0 + i as f64).collect();
        let result = forecaster.forecast_signal(&series, SignalKind::Solar);
        assert_eq!(result.forecast.map(|f| f.len()), Some(10));
    }

    #[test]
    fn test_failed_solar_fit_reports_zero_accuracy() {
        let result = Forecaster::default().forecast_signal(&[900.0], SignalKind::Solar);
        assert!(result.forecast.is_none());
        assert_eq!(result.accuracy_pct, 0.0);
    }

    #[test]
    fn test_mape_and_accuracy() {
        let mape = mean_absolute_percentage_error(&[100.0, 200.0], &[90.0, 220.0]);
        assert!((mape - 10.0).abs() < 1e-3);
        assert!((accuracy_from_mape(mape) - 90.0).abs() < 1e-3);
        assert_eq!(accuracy_from_mape(250.0), 0.0);
        assert_eq!(accuracy_from_mape(f64::NAN), 0.0);
    }

    #[test]
    fn test_degenerate_rain_detection() {
        assert!(is_degenerate_rain(&[]));
        assert!(is_degenerate_rain(&[5.0, 6.0, 7.0, 8.0]));
        assert!(is_degenerate_rain(&[0.0, 0.05, 0.0, 0.02, 0.09, 0.0]));
        assert!(!is_degenerate_rain(&[0.0, 0.5, 0.0, 0.2, 0.9, 0.0]));
    }
}
