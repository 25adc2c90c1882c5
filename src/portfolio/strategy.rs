//! Cash-flow strategies: where income goes and which assets fund expenses

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::portfolio::state::PortfolioState;
use crate::profile::{LiquidityLevel, PortfolioConfiguration};

const TWELVE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Seam for cash-flow allocation policies
///
/// Returned maps are per-asset deltas: positive for invested income,
/// negative for sold holdings. Callers apply them to the portfolio state.
pub trait CashFlowStrategy: Send + Sync {
    /// Allocate a year's positive net cash flow across assets
    fn handle_income(
        &self,
        income: Decimal,
        state: &PortfolioState,
        annual_expenses: Decimal,
        target_allocation: &BTreeMap<String, Decimal>,
    ) -> BTreeMap<String, Decimal>;

    /// Fund a year's expense gap by selling holdings
    ///
    /// An uncovered remainder is simply not present in the deltas; the
    /// caller's debt tracking deals with it.
    fn handle_expense(&self, expense: Decimal, state: &PortfolioState)
        -> BTreeMap<String, Decimal>;

    /// Stable identifier for logs and output
    fn display_name(&self) -> &'static str;
}

/// Liquidity-tiered strategy
///
/// Income tops up the high-liquidity cash buffer first, then flows into
/// non-high-liquidity assets proportionally to their target weights.
/// Expenses drain tiers High → Medium → Low, selling the lowest-expected-
/// return asset within a tier to exhaustion before the next.
#[derive(Debug, Clone)]
pub struct LiquidityAwareFlowStrategy {
    config: PortfolioConfiguration,
    cash_buffer_months: u32,
}

impl LiquidityAwareFlowStrategy {
    pub fn new(config: PortfolioConfiguration, cash_buffer_months: u32) -> Self {
        Self {
            config,
            cash_buffer_months,
        }
    }

    fn liquidity_of(&self, name: &str) -> Option<LiquidityLevel> {
        self.config.asset(name).map(|a| a.liquidity_level)
    }

    /// High-liquidity asset receiving buffer top-ups: largest target weight,
    /// name order breaking ties
    fn buffer_asset(&self, target: &BTreeMap<String, Decimal>) -> Option<String> {
        target
            .iter()
            .filter(|(name, _)| self.liquidity_of(name) == Some(LiquidityLevel::High))
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(name, _)| name.clone())
    }
}

impl CashFlowStrategy for LiquidityAwareFlowStrategy {
    fn handle_income(
        &self,
        income: Decimal,
        state: &PortfolioState,
        annual_expenses: Decimal,
        target_allocation: &BTreeMap<String, Decimal>,
    ) -> BTreeMap<String, Decimal> {
        let mut deltas: BTreeMap<String, Decimal> = BTreeMap::new();
        if income <= Decimal::ZERO {
            return deltas;
        }

        let mut remaining = income;

        // Step 1: replenish the cash buffer
        let buffer_target =
            annual_expenses * Decimal::from(self.cash_buffer_months) / TWELVE;
        let high_value: Decimal = state
            .values()
            .iter()
            .filter(|(name, _)| self.liquidity_of(name) == Some(LiquidityLevel::High))
            .map(|(_, v)| *v)
            .sum();
        let shortfall = (buffer_target - high_value).max(Decimal::ZERO);
        if shortfall > Decimal::ZERO {
            if let Some(buffer_asset) = self.buffer_asset(target_allocation) {
                let to_buffer = remaining.min(shortfall);
                deltas.insert(buffer_asset, to_buffer);
                remaining -= to_buffer;
            }
        }
        if remaining <= Decimal::ZERO {
            return deltas;
        }

        // Step 2: invest the rest proportionally to the target weights of the
        // non-high-liquidity assets (renormalized); a portfolio with only
        // high-liquidity assets falls back to all-asset weights
        let invest_weights: Vec<(&String, Decimal)> = {
            let non_high: Vec<(&String, Decimal)> = target_allocation
                .iter()
                .filter(|(name, _)| self.liquidity_of(name) != Some(LiquidityLevel::High))
                .map(|(name, w)| (name, *w))
                .collect();
            if non_high.iter().any(|(_, w)| *w > Decimal::ZERO) {
                non_high
            } else {
                target_allocation.iter().map(|(name, w)| (name, *w)).collect()
            }
        };

        let weight_sum: Decimal = invest_weights.iter().map(|(_, w)| *w).sum();
        if weight_sum <= Decimal::ZERO {
            return deltas;
        }
        for (name, weight) in invest_weights {
            if weight <= Decimal::ZERO {
                continue;
            }
            let amount = remaining * weight / weight_sum;
            *deltas.entry(name.clone()).or_insert(Decimal::ZERO) += amount;
        }

        deltas
    }

    fn handle_expense(
        &self,
        expense: Decimal,
        state: &PortfolioState,
    ) -> BTreeMap<String, Decimal> {
        let mut deltas: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut needed = expense;
        if needed <= Decimal::ZERO {
            return deltas;
        }

        for tier in LiquidityLevel::DRAIN_ORDER {
            if needed <= Decimal::ZERO {
                break;
            }

            // Lowest expected return sold first within the tier
            let mut tier_assets: Vec<&str> = state
                .values()
                .keys()
                .filter(|name| self.liquidity_of(name) == Some(tier))
                .map(String::as_str)
                .collect();
            tier_assets.sort_by(|a, b| {
                let ra = self.config.asset(a).map(|x| x.expected_return);
                let rb = self.config.asset(b).map(|x| x.expected_return);
                ra.cmp(&rb).then(a.cmp(b))
            });

            for name in tier_assets {
                if needed <= Decimal::ZERO {
                    break;
                }
                let available = state.value(name);
                if available <= Decimal::ZERO {
                    continue;
                }
                let take = needed.min(available);
                deltas.insert(name.to_string(), -take);
                needed -= take;
            }
        }

        deltas
    }

    fn display_name(&self) -> &'static str {
        "liquidity-aware"
    }
}
