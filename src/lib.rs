//! FIRE Simulation Engine - deterministic sustainability projections with
//! Monte Carlo risk analysis
//!
//! This library provides:
//! - Validated profile/portfolio input records
//! - Portfolio allocation, return and rebalancing math
//! - A liquidity-tiered cash-flow strategy
//! - A year-by-year engine with depletion/debt tracking
//! - A 15-event black swan catalog with decaying impact
//! - Seeded Monte Carlo aggregation and sensitivity sweeps

pub mod error;
pub mod events;
pub mod montecarlo;
pub mod portfolio;
pub mod profile;
pub mod projection;

// Re-export commonly used types
pub use error::{SimulationError, ValidationError};
pub use events::{BlackSwanEvent, EventId};
pub use montecarlo::{MonteCarloResult, MonteCarloSimulator};
pub use profile::{
    AssetClass, LiquidityLevel, PortfolioConfiguration, SimulationSettings, UserProfile,
};
pub use projection::{
    EngineInput, FireCalculationResult, FireEngine, ProjectionRow, YearlyState,
};
