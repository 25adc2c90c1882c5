//! Stateless portfolio math: target allocation, expected return, rebalancing

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::portfolio::state::PortfolioState;
use crate::profile::PortfolioConfiguration;

/// Allocation drift beyond which a rebalance is triggered
pub const REBALANCE_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

/// Stateless calculator over one portfolio configuration
#[derive(Debug, Clone)]
pub struct PortfolioCalculator {
    config: PortfolioConfiguration,
}

impl PortfolioCalculator {
    pub fn new(config: PortfolioConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PortfolioConfiguration {
        &self.config
    }

    /// Target allocation ratios at a given age
    ///
    /// Currently age-independent; the age parameter is the hook for a
    /// future glide path.
    pub fn target_allocation(&self, _age: u8) -> BTreeMap<String, Decimal> {
        self.config
            .assets()
            .iter()
            .map(|a| {
                (
                    a.name().to_string(),
                    a.allocation_percentage / Decimal::ONE_HUNDRED,
                )
            })
            .collect()
    }

    /// Deterministic expected return on `value` under `allocation`
    ///
    /// `value × Σ allocation[a] × expected_return[a] / 100`; zero for a
    /// non-positive value.
    pub fn returns_by_allocation(
        &self,
        allocation: &BTreeMap<String, Decimal>,
        value: Decimal,
    ) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let blended_rate: Decimal = allocation
            .iter()
            .filter_map(|(name, ratio)| {
                self.config
                    .asset(name)
                    .map(|a| *ratio * a.expected_return / Decimal::ONE_HUNDRED)
            })
            .sum();

        value * blended_rate
    }

    /// Per-asset randomized return: rate = expected/100 + volatility/100 × factor
    ///
    /// Unused by the Monte Carlo path, which keeps portfolio returns
    /// deterministic and perturbs income/expense instead; retained as a
    /// future extension point.
    pub fn returns_with_volatility(
        &self,
        allocation: &BTreeMap<String, Decimal>,
        value: Decimal,
        random_factors: &BTreeMap<String, Decimal>,
    ) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let blended_rate: Decimal = allocation
            .iter()
            .filter_map(|(name, ratio)| {
                self.config.asset(name).map(|a| {
                    let factor = random_factors
                        .get(name)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    let rate = a.expected_return / Decimal::ONE_HUNDRED
                        + a.volatility / Decimal::ONE_HUNDRED * factor;
                    *ratio * rate
                })
            })
            .sum();

        value * blended_rate
    }

    /// True when rebalancing is enabled and any asset drifted beyond the
    /// threshold
    pub fn should_rebalance(
        &self,
        current: &BTreeMap<String, Decimal>,
        target: &BTreeMap<String, Decimal>,
        threshold: Decimal,
    ) -> bool {
        if !self.config.enable_rebalancing() {
            return false;
        }

        target.iter().any(|(name, target_ratio)| {
            let current_ratio = current.get(name).copied().unwrap_or(Decimal::ZERO);
            (current_ratio - *target_ratio).abs() > threshold
        })
    }

    /// Per-asset trade amounts restoring the target allocation exactly
    ///
    /// No transaction costs; deltas sum to zero up to division residue.
    pub fn rebalancing_trades(
        &self,
        state: &PortfolioState,
        target: &BTreeMap<String, Decimal>,
    ) -> BTreeMap<String, Decimal> {
        let total = state.total_value();
        target
            .iter()
            .map(|(name, ratio)| {
                let target_value = total * *ratio;
                (name.clone(), target_value - state.value(name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AssetClass, LiquidityLevel};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn calculator(enable_rebalancing: bool) -> PortfolioCalculator {
        let config = PortfolioConfiguration::new(
            vec![
                AssetClass::new("cash", dec(10), dec(1), Decimal::ZERO, LiquidityLevel::High)
                    .unwrap(),
                AssetClass::new("stocks", dec(60), dec(7), dec(15), LiquidityLevel::Low).unwrap(),
                AssetClass::new("bonds", dec(30), dec(3), dec(5), LiquidityLevel::Medium).unwrap(),
            ],
            enable_rebalancing,
        )
        .unwrap();
        PortfolioCalculator::new(config)
    }

    #[test]
    fn test_target_allocation_sums_to_one() {
        let calc = calculator(true);
        let target = calc.target_allocation(40);
        let sum: Decimal = target.values().copied().sum();
        assert!((sum - Decimal::ONE).abs() < Decimal::new(1, 3));
    }

    #[test]
    fn test_returns_by_allocation_blend() {
        // 0.6*7% + 0.3*3% + 0.1*1% = 5.2% of 100,000 = 5,200
        let calc = calculator(true);
        let allocation = calc.target_allocation(40);
        let returns = calc.returns_by_allocation(&allocation, dec(100_000));
        assert_eq!(returns, dec(5_200));
    }

    #[test]
    fn test_returns_zero_for_nonpositive_value() {
        let calc = calculator(true);
        let allocation = calc.target_allocation(40);
        assert_eq!(
            calc.returns_by_allocation(&allocation, Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            calc.returns_by_allocation(&allocation, dec(-500)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_returns_with_volatility() {
        // One-sigma up move on every asset:
        // 0.6*(7%+15%) + 0.3*(3%+5%) + 0.1*(1%+0%) = 15.7% of 100,000
        let calc = calculator(true);
        let allocation = calc.target_allocation(40);
        let factors: BTreeMap<String, Decimal> = allocation
            .keys()
            .map(|name| (name.clone(), Decimal::ONE))
            .collect();
        let returns = calc.returns_with_volatility(&allocation, dec(100_000), &factors);
        assert_eq!(returns, dec(15_700));
    }

    #[test]
    fn test_should_rebalance_threshold() {
        let calc = calculator(true);
        let target = calc.target_allocation(40);

        let mut drifted = target.clone();
        drifted.insert("stocks".to_string(), Decimal::new(70, 2));
        drifted.insert("bonds".to_string(), Decimal::new(20, 2));
        assert!(calc.should_rebalance(&drifted, &target, REBALANCE_THRESHOLD));
        assert!(!calc.should_rebalance(&target, &target, REBALANCE_THRESHOLD));
    }

    #[test]
    fn test_rebalancing_disabled() {
        let calc = calculator(false);
        let target = calc.target_allocation(40);
        let mut drifted = target.clone();
        drifted.insert("stocks".to_string(), Decimal::ONE);
        assert!(!calc.should_rebalance(&drifted, &target, REBALANCE_THRESHOLD));
    }

    #[test]
    fn test_rebalancing_trades_net_to_zero() {
        let calc = calculator(true);
        let target = calc.target_allocation(40);
        let state = PortfolioState::new(
            [
                ("cash".to_string(), dec(50_000)),
                ("stocks".to_string(), dec(30_000)),
                ("bonds".to_string(), dec(20_000)),
            ]
            .into_iter()
            .collect(),
        );

        let trades = calc.rebalancing_trades(&state, &target);
        let net: Decimal = trades.values().copied().sum();
        assert_eq!(net, Decimal::ZERO);
        assert_eq!(trades["cash"], dec(-40_000));
        assert_eq!(trades["stocks"], dec(30_000));
        assert_eq!(trades["bonds"], dec(10_000));
    }
}
