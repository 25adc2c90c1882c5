//! Immutable black swan event definitions
//!
//! Fifteen low-probability, high-impact shocks to income or expense.
//! Probabilities and durations are catalog constants; age windows are
//! personalized per profile at construction time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

/// Stable identifier for each catalog event
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventId {
    FinancialCrisis,
    EconomicRecession,
    MarketCrash,
    Hyperinflation,
    Unemployment,
    IndustryCollapse,
    UnexpectedPromotion,
    MajorIllness,
    LongTermCare,
    RegionalConflict,
    GlobalWar,
    EconomicSanctions,
    EnergyCrisis,
    UnexpectedInheritance,
    InvestmentWindfall,
}

impl EventId {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventId::FinancialCrisis => "financial_crisis",
            EventId::EconomicRecession => "economic_recession",
            EventId::MarketCrash => "market_crash",
            EventId::Hyperinflation => "hyperinflation",
            EventId::Unemployment => "unemployment",
            EventId::IndustryCollapse => "industry_collapse",
            EventId::UnexpectedPromotion => "unexpected_promotion",
            EventId::MajorIllness => "major_illness",
            EventId::LongTermCare => "long_term_care",
            EventId::RegionalConflict => "regional_conflict",
            EventId::GlobalWar => "global_war",
            EventId::EconomicSanctions => "economic_sanctions",
            EventId::EnergyCrisis => "energy_crisis",
            EventId::UnexpectedInheritance => "unexpected_inheritance",
            EventId::InvestmentWindfall => "investment_windfall",
        }
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable probabilistic event definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackSwanEvent {
    pub id: EventId,

    /// Chance of triggering in any in-range year, [0, 1]
    pub annual_probability: f64,

    /// Total active years including the trigger year, > 0
    pub duration_years: u32,

    /// Impact multiplier for the years after the trigger year, (0, 1]
    pub recovery_factor: Decimal,

    /// First age at which the event can trigger (inclusive)
    pub min_age: u8,

    /// Last age at which the event can trigger (inclusive)
    pub max_age: u8,

    /// Relative income shock while active (−0.4 means −40%)
    pub income_impact: Decimal,

    /// Relative expense shock while active
    pub expense_impact: Decimal,
}

impl BlackSwanEvent {
    pub fn applies_at(&self, age: u8) -> bool {
        age >= self.min_age && age <= self.max_age
    }
}

/// Build the 15-event catalog with age windows personalized to a profile
///
/// Working-life events close at the earlier of the FIRE age and the legal
/// retirement age; health and care events open in later life.
pub fn personalized_catalog(profile: &UserProfile) -> Vec<BlackSwanEvent> {
    let current = profile.current_age();
    let fire = profile.expected_fire_age();
    let life = profile.life_expectancy();
    let retirement = profile.legal_retirement_age().unwrap_or(life);
    let working_start = current.max(22);
    let working_end = fire.min(retirement);

    let pct = |n: i64| Decimal::new(n, 2); // n/100

    vec![
        BlackSwanEvent {
            id: EventId::FinancialCrisis,
            annual_probability: 0.008,
            duration_years: 2,
            recovery_factor: pct(80),
            min_age: current,
            max_age: life,
            income_impact: pct(-40),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::EconomicRecession,
            annual_probability: 0.024,
            duration_years: 1,
            recovery_factor: Decimal::ONE,
            min_age: current,
            max_age: life,
            income_impact: pct(-15),
            expense_impact: pct(-5),
        },
        BlackSwanEvent {
            id: EventId::MarketCrash,
            annual_probability: 0.016,
            duration_years: 1,
            recovery_factor: Decimal::ONE,
            min_age: current,
            max_age: life,
            income_impact: pct(-10),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::Hyperinflation,
            annual_probability: 0.004,
            duration_years: 3,
            recovery_factor: pct(70),
            min_age: current,
            max_age: life,
            income_impact: Decimal::ZERO,
            expense_impact: pct(25),
        },
        BlackSwanEvent {
            id: EventId::Unemployment,
            annual_probability: 0.020,
            duration_years: 2,
            recovery_factor: pct(60),
            min_age: working_start,
            max_age: working_end,
            income_impact: pct(-80),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::IndustryCollapse,
            annual_probability: 0.006,
            duration_years: 4,
            recovery_factor: pct(50),
            min_age: working_start,
            max_age: working_end,
            income_impact: pct(-50),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::UnexpectedPromotion,
            annual_probability: 0.020,
            duration_years: 3,
            recovery_factor: pct(90),
            min_age: working_start,
            max_age: working_end,
            income_impact: pct(30),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::MajorIllness,
            annual_probability: 0.010,
            duration_years: 2,
            recovery_factor: pct(70),
            min_age: current.max(40),
            max_age: life,
            income_impact: pct(-30),
            expense_impact: pct(50),
        },
        BlackSwanEvent {
            id: EventId::LongTermCare,
            annual_probability: 0.012,
            duration_years: 5,
            recovery_factor: pct(90),
            min_age: current.max(65),
            max_age: life,
            income_impact: Decimal::ZERO,
            expense_impact: pct(60),
        },
        BlackSwanEvent {
            id: EventId::RegionalConflict,
            annual_probability: 0.004,
            duration_years: 2,
            recovery_factor: pct(70),
            min_age: current,
            max_age: life,
            income_impact: pct(-20),
            expense_impact: pct(15),
        },
        BlackSwanEvent {
            id: EventId::GlobalWar,
            annual_probability: 0.002,
            duration_years: 5,
            recovery_factor: pct(50),
            min_age: current,
            max_age: life,
            income_impact: pct(-40),
            expense_impact: pct(30),
        },
        BlackSwanEvent {
            id: EventId::EconomicSanctions,
            annual_probability: 0.006,
            duration_years: 3,
            recovery_factor: pct(60),
            min_age: current,
            max_age: life,
            income_impact: pct(-25),
            expense_impact: pct(20),
        },
        BlackSwanEvent {
            id: EventId::EnergyCrisis,
            annual_probability: 0.010,
            duration_years: 2,
            recovery_factor: pct(80),
            min_age: current,
            max_age: life,
            income_impact: Decimal::ZERO,
            expense_impact: pct(20),
        },
        BlackSwanEvent {
            id: EventId::UnexpectedInheritance,
            annual_probability: 0.005,
            duration_years: 1,
            recovery_factor: Decimal::ONE,
            min_age: current,
            max_age: life,
            income_impact: Decimal::new(150, 2),
            expense_impact: Decimal::ZERO,
        },
        BlackSwanEvent {
            id: EventId::InvestmentWindfall,
            annual_probability: 0.008,
            duration_years: 1,
            recovery_factor: Decimal::ONE,
            min_age: current,
            max_age: life,
            income_impact: pct(50),
            expense_impact: Decimal::ZERO,
        },
    ]
}
