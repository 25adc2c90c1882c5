//! Profile and portfolio data structures
//!
//! All records validate their invariants at construction and are immutable
//! afterwards. Monetary amounts and financial rates are `Decimal`; a 50+
//! year, thousand-trial simulation accumulates visible drift under binary
//! floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tolerance for the 100% allocation-sum invariant
const ALLOCATION_SUM_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6); // 0.000001

/// Liquidity tier of an asset class
///
/// Governs withdrawal order (High drained first) and which assets receive
/// the cash-buffer top-up from incoming funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityLevel {
    /// Cash-like: drained first, holds the safety buffer
    High,
    /// Bonds and similar
    Medium,
    /// Equity, real estate and other slow-to-exit holdings
    Low,
}

impl LiquidityLevel {
    /// Tiers in withdrawal order
    pub const DRAIN_ORDER: [LiquidityLevel; 3] =
        [LiquidityLevel::High, LiquidityLevel::Medium, LiquidityLevel::Low];
}

/// A single asset class within a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    /// Normalized identifier: trimmed, lowercased, internal whitespace
    /// collapsed to single spaces
    name: String,

    /// Original display name as entered
    pub display_name: String,

    /// Share of the portfolio in percent, [0, 100]
    pub allocation_percentage: Decimal,

    /// Expected annual return in percent (7 means 7%)
    pub expected_return: Decimal,

    /// Annual volatility in percent
    pub volatility: Decimal,

    /// Liquidity tier
    pub liquidity_level: LiquidityLevel,
}

/// Collapse whitespace and case so "  Global  Stocks " and "global stocks"
/// name the same asset
fn normalize_name(display_name: &str) -> String {
    display_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl AssetClass {
    pub fn new(
        display_name: impl Into<String>,
        allocation_percentage: Decimal,
        expected_return: Decimal,
        volatility: Decimal,
        liquidity_level: LiquidityLevel,
    ) -> Result<Self, ValidationError> {
        let display_name = display_name.into();
        let name = normalize_name(&display_name);

        let hundred = Decimal::ONE_HUNDRED;
        if allocation_percentage < Decimal::ZERO || allocation_percentage > hundred {
            return Err(ValidationError::AssetFieldOutOfRange {
                name,
                field: "allocation_percentage",
                value: allocation_percentage.to_string(),
                min: "0".to_string(),
                max: "100".to_string(),
            });
        }
        if volatility < Decimal::ZERO {
            return Err(ValidationError::AssetFieldOutOfRange {
                name,
                field: "volatility",
                value: volatility.to_string(),
                min: "0".to_string(),
                max: "inf".to_string(),
            });
        }

        Ok(Self {
            name,
            display_name,
            allocation_percentage,
            expected_return,
            volatility,
            liquidity_level,
        })
    }

    /// Normalized identifier used as the key in all portfolio maps
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A validated portfolio: asset classes plus rebalancing policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfiguration {
    assets: Vec<AssetClass>,
    enable_rebalancing: bool,
}

impl PortfolioConfiguration {
    /// Build a portfolio, enforcing the allocation-sum and unique-name
    /// invariants
    pub fn new(
        assets: Vec<AssetClass>,
        enable_rebalancing: bool,
    ) -> Result<Self, ValidationError> {
        if assets.is_empty() {
            return Err(ValidationError::EmptyPortfolio);
        }

        let sum: Decimal = assets.iter().map(|a| a.allocation_percentage).sum();
        if (sum - Decimal::ONE_HUNDRED).abs() > ALLOCATION_SUM_EPSILON {
            return Err(ValidationError::AllocationSum {
                sum: sum.to_string(),
            });
        }

        for (i, asset) in assets.iter().enumerate() {
            if assets[..i].iter().any(|other| other.name == asset.name) {
                return Err(ValidationError::DuplicateAssetName {
                    name: asset.name.clone(),
                });
            }
        }

        Ok(Self {
            assets,
            enable_rebalancing,
        })
    }

    pub fn assets(&self) -> &[AssetClass] {
        &self.assets
    }

    pub fn enable_rebalancing(&self) -> bool {
        self.enable_rebalancing
    }

    /// Look up an asset by its normalized name
    pub fn asset(&self, name: &str) -> Option<&AssetClass> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// A validated user profile
///
/// Immutable after construction; all fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    birth_year: i32,
    as_of_year: i32,
    expected_fire_age: u8,
    legal_retirement_age: Option<u8>,
    life_expectancy: u8,
    current_net_worth: Decimal,
    /// Annual inflation as a fraction (0.03 = 3%)
    inflation_rate: Decimal,
    /// Base safety buffer in months of expenses
    safety_buffer_months: u32,
    /// Annual discount rate for the bridge-period buffer, as a fraction
    bridge_discount_rate: Decimal,
    portfolio: PortfolioConfiguration,
}

impl UserProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        birth_year: i32,
        as_of_year: i32,
        expected_fire_age: u8,
        legal_retirement_age: Option<u8>,
        life_expectancy: u8,
        current_net_worth: Decimal,
        inflation_rate: Decimal,
        safety_buffer_months: u32,
        bridge_discount_rate: Decimal,
        portfolio: PortfolioConfiguration,
    ) -> Result<Self, ValidationError> {
        if birth_year < 1950 || birth_year > as_of_year {
            return Err(ValidationError::BirthYearOutOfRange {
                birth_year,
                as_of_year,
            });
        }

        let current_age = (as_of_year - birth_year) as u8;
        let ordered = current_age <= expected_fire_age
            && expected_fire_age <= legal_retirement_age.unwrap_or(expected_fire_age)
            && legal_retirement_age.unwrap_or(expected_fire_age) <= life_expectancy;
        if !ordered {
            return Err(ValidationError::AgeProgression {
                current: current_age,
                fire: expected_fire_age,
                retirement: legal_retirement_age,
                life_expectancy,
            });
        }

        Ok(Self {
            birth_year,
            as_of_year,
            expected_fire_age,
            legal_retirement_age,
            life_expectancy,
            current_net_worth,
            inflation_rate,
            safety_buffer_months,
            bridge_discount_rate,
            portfolio,
        })
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    pub fn as_of_year(&self) -> i32 {
        self.as_of_year
    }

    /// Age in the as-of year
    pub fn current_age(&self) -> u8 {
        (self.as_of_year - self.birth_year) as u8
    }

    pub fn expected_fire_age(&self) -> u8 {
        self.expected_fire_age
    }

    pub fn legal_retirement_age(&self) -> Option<u8> {
        self.legal_retirement_age
    }

    pub fn life_expectancy(&self) -> u8 {
        self.life_expectancy
    }

    pub fn current_net_worth(&self) -> Decimal {
        self.current_net_worth
    }

    pub fn inflation_rate(&self) -> Decimal {
        self.inflation_rate
    }

    pub fn safety_buffer_months(&self) -> u32 {
        self.safety_buffer_months
    }

    pub fn bridge_discount_rate(&self) -> Decimal {
        self.bridge_discount_rate
    }

    pub fn portfolio(&self) -> &PortfolioConfiguration {
        &self.portfolio
    }
}
