//! Validated input data model: user profile, asset classes, settings

pub mod data;
pub mod settings;

pub use data::{AssetClass, LiquidityLevel, PortfolioConfiguration, UserProfile};
pub use settings::SimulationSettings;
