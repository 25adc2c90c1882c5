//! Black swan event catalog and per-scenario activity tracking

pub mod catalog;
pub mod tracker;

pub use catalog::{personalized_catalog, BlackSwanEvent, EventId};
pub use tracker::ActiveEventTracker;
