//! Per-year output records and the full-horizon calculation result

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State of the plan at the end of one simulated year
///
/// Produced once per year; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyState {
    /// Age during the year
    pub age: u8,

    /// Calendar year
    pub year: i32,

    /// Annual income (already growth-adjusted by the external planner)
    pub income: Decimal,

    /// Annual expense (already inflation-adjusted)
    pub expense: Decimal,

    /// income − expense
    pub net_cash_flow: Decimal,

    /// Portfolio value at year end, never negative
    pub portfolio_value: Decimal,

    /// Net worth: portfolio value while solvent, −accumulated_debt when
    /// depleted. May be negative.
    pub net_worth: Decimal,

    /// Deterministic investment return earned this year
    pub investment_return: Decimal,

    /// Whether net worth covers the required safety buffer
    pub is_sustainable: bool,

    /// 25× this year's expense
    pub fire_number: Decimal,

    /// portfolio_value / fire_number, 0 when fire_number is not positive
    pub fire_progress: Decimal,

    /// Expense × required buffer months / 12 (bridge-discounted)
    pub safety_buffer_amount: Decimal,
}

/// Aggregate result of a full-horizon deterministic run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireCalculationResult {
    /// True only when every simulated year is sustainable
    pub is_fire_achievable: bool,

    /// Net worth at the FIRE-age index
    pub fire_net_worth: Decimal,

    /// Minimum net worth from the FIRE age onward
    pub min_net_worth_after_fire: Decimal,

    /// Net worth in the final simulated year
    pub final_net_worth: Decimal,

    /// Minimum of net_worth / safety_buffer_amount over years with a
    /// positive buffer
    pub min_safety_buffer_ratio: Decimal,

    /// 25× the average of the first five years' expenses
    pub traditional_fire_number: Decimal,

    /// Whether any year's portfolio value reached the traditional number
    pub traditional_fire_achieved: bool,

    /// Per-year trace
    pub yearly_states: Vec<YearlyState>,
}

impl FireCalculationResult {
    /// All-zero result for an empty projection: no evidence of
    /// sustainability, so not achievable
    pub fn empty() -> Self {
        Self {
            is_fire_achievable: false,
            fire_net_worth: Decimal::ZERO,
            min_net_worth_after_fire: Decimal::ZERO,
            final_net_worth: Decimal::ZERO,
            min_safety_buffer_ratio: Decimal::ZERO,
            traditional_fire_number: Decimal::ZERO,
            traditional_fire_achieved: false,
            yearly_states: Vec::new(),
        }
    }
}
