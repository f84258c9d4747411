//! Domain models for the Solar Route Planner

mod analysis;
mod forecast;
mod reading;
mod route;
mod status;

pub use analysis::*;
pub use forecast::*;
pub use reading::*;
pub use route::*;
pub use status::*;
