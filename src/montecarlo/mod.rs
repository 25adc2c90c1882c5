//! Monte Carlo risk-analysis layer

pub mod rng;
pub mod simulator;
pub mod stats;

pub use rng::{Lcg, ScenarioRng};
pub use simulator::{
    BlackSwanAnalysis, MonteCarloResult, MonteCarloSimulator, ScenarioOutcome,
};
pub use stats::DistributionStats;
