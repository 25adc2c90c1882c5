//! Portfolio math and per-scenario portfolio state

pub mod calculator;
pub mod simulator;
pub mod state;
pub mod strategy;

pub use calculator::PortfolioCalculator;
pub use simulator::{PortfolioSimulator, YearlyPortfolioResult};
pub use state::PortfolioState;
pub use strategy::{CashFlowStrategy, LiquidityAwareFlowStrategy};
