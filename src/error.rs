//! Error types for input validation and simulation control

use thiserror::Error;

/// Fatal input-validation errors raised at construction time.
///
/// These are rejected inputs, never retried or recovered internally.
/// Numeric edge cases during simulation (zero-value portfolio, zero
/// expense, depleted portfolio) are defined numeric policy, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Ages must satisfy current <= fire <= retirement <= life expectancy
    #[error("age progression violated: current {current}, fire {fire}, retirement {retirement:?}, life expectancy {life_expectancy}")]
    AgeProgression {
        current: u8,
        fire: u8,
        retirement: Option<u8>,
        life_expectancy: u8,
    },

    /// Birth year outside [1950, as_of_year]
    #[error("birth year {birth_year} outside [1950, {as_of_year}]")]
    BirthYearOutOfRange { birth_year: i32, as_of_year: i32 },

    /// Allocation percentages must sum to exactly 100 within epsilon
    #[error("asset allocations sum to {sum}%, expected 100%")]
    AllocationSum { sum: String },

    /// Normalized asset names must be unique case-insensitively
    #[error("duplicate asset name '{name}' after normalization")]
    DuplicateAssetName { name: String },

    /// A portfolio must hold at least one asset class
    #[error("portfolio has no asset classes")]
    EmptyPortfolio,

    /// Per-asset field outside its allowed range
    #[error("asset '{name}': {field} = {value} outside [{min}, {max}]")]
    AssetFieldOutOfRange {
        name: String,
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    /// Simulation settings field outside its allowed range
    #[error("settings: {field} = {value} outside [{min}, {max}]")]
    SettingsOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// num_simulations and yield_interval must be positive
    #[error("settings: {field} must be positive")]
    NonPositiveInterval { field: &'static str },
}

/// Errors from the Monte Carlo layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// `analyze_sensitivity` received a parameter it does not support
    #[error("unknown sensitivity parameter '{0}' (expected income_volatility, expense_volatility or black_swan_probability)")]
    UnknownParameter(String),

    /// A cancellable run was aborted; partial aggregates are discarded
    #[error("simulation cancelled")]
    Cancelled,
}
