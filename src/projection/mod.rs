//! Deterministic full-horizon FIRE projection

pub mod buffer;
pub mod engine;
pub mod state;

pub use buffer::required_buffer_months;
pub use engine::{EngineInput, FireEngine, ProjectionRow};
pub use state::{FireCalculationResult, YearlyState};
