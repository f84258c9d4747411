//! Errors raised by the decision core

use thiserror::Error;

/// Model fitting failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Series contains NaN or infinite values")]
    NonFiniteData,

    #[error("Model did not converge: {0}")]
    NonConvergence(String),
}
