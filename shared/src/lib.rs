//! Shared types and decision logic for the Solar Route Planner
//!
//! This crate holds the domain models together with the pure parts of the
//! system: forecasting, route scoring, route selection and the
//! recalculation policy. It performs no I/O; the backend supplies readings,
//! live conditions and candidate routes.

pub mod error;
pub mod forecast;
pub mod models;
pub mod recalc;
pub mod scoring;
pub mod selection;
pub mod types;
pub mod validation;

pub use error::*;
pub use forecast::*;
pub use models::*;
pub use recalc::*;
pub use scoring::*;
pub use selection::*;
pub use types::*;
pub use validation::*;
