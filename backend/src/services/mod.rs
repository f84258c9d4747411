//! Business logic services for the Solar Route Planner

pub mod analysis;
pub mod ingest;
pub mod monitor;
pub mod readings;

pub use ingest::IngestService;
pub use monitor::Monitor;
pub use readings::ReadingService;
