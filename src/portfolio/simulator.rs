//! Stateful per-scenario portfolio simulator
//!
//! Applies returns, cash flow and rebalancing year by year against one
//! exclusively-owned `PortfolioState`.

use std::collections::BTreeMap;

use log::debug;
use rust_decimal::Decimal;

use crate::portfolio::calculator::{PortfolioCalculator, REBALANCE_THRESHOLD};
use crate::portfolio::state::PortfolioState;
use crate::portfolio::strategy::CashFlowStrategy;
use crate::profile::UserProfile;

/// Outcome of one simulated year at the portfolio level
#[derive(Debug, Clone)]
pub struct YearlyPortfolioResult {
    /// Total value before returns and cash flow
    pub starting_value: Decimal,

    /// Total value after returns, cash flow and rebalancing (never negative)
    pub ending_value: Decimal,

    /// Deterministic investment return earned on the starting allocation
    pub investment_return: Decimal,

    /// Per-asset cash-flow deltas applied this year
    pub cash_flow: BTreeMap<String, Decimal>,

    /// Whether rebalancing trades were executed
    pub rebalanced: bool,
}

/// Holds one mutable `PortfolioState` per scenario
pub struct PortfolioSimulator {
    calculator: PortfolioCalculator,
    strategy: Box<dyn CashFlowStrategy>,
    state: PortfolioState,
    initial_state: PortfolioState,
}

impl PortfolioSimulator {
    /// Distribute the profile's net worth across assets per the target
    /// allocation at the current age
    pub fn new(profile: &UserProfile, strategy: Box<dyn CashFlowStrategy>) -> Self {
        let calculator = PortfolioCalculator::new(profile.portfolio().clone());
        let target = calculator.target_allocation(profile.current_age());
        let initial_state = PortfolioState::from_allocation(profile.current_net_worth(), &target);

        Self {
            calculator,
            strategy,
            state: initial_state.clone(),
            initial_state,
        }
    }

    pub fn state(&self) -> &PortfolioState {
        &self.state
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.display_name()
    }

    /// Restore the originally-constructed state
    ///
    /// Must run before each independent full-horizon pass so the simulator
    /// behaves as a pure function from the engine's perspective.
    pub fn reset_to_initial(&mut self) {
        self.state = self.initial_state.clone();
    }

    /// Simulate one year: returns, then cash flow, then rebalancing
    pub fn simulate_year(
        &mut self,
        age: u8,
        net_cash_flow: Decimal,
        annual_expenses: Decimal,
    ) -> YearlyPortfolioResult {
        let starting_value = self.state.total_value();
        let starting_allocation = self.state.allocation();

        // 1. Deterministic returns on the starting allocation, applied
        //    proportionally to each asset
        let investment_return =
            self.calculator.returns_by_allocation(&starting_allocation, starting_value);
        self.state.apply_proportional_return(investment_return);

        // 2. Cash flow against the post-return state
        let target = self.calculator.target_allocation(age);
        let cash_flow = if net_cash_flow > Decimal::ZERO {
            self.strategy
                .handle_income(net_cash_flow, &self.state, annual_expenses, &target)
        } else if net_cash_flow < Decimal::ZERO {
            self.strategy.handle_expense(-net_cash_flow, &self.state)
        } else {
            BTreeMap::new()
        };

        // 3. Apply deltas; individual assets floor at zero
        self.state.apply_deltas(&cash_flow);

        // 4. Exact rebalancing when drift exceeds the threshold
        let current_allocation = self.state.allocation();
        let rebalanced =
            self.calculator
                .should_rebalance(&current_allocation, &target, REBALANCE_THRESHOLD);
        if rebalanced {
            let trades = self.calculator.rebalancing_trades(&self.state, &target);
            self.state.apply_deltas(&trades);
        }

        let ending_value = self.state.total_value();
        debug!(
            "age {age}: start {starting_value}, return {investment_return}, ncf {net_cash_flow}, end {ending_value}, rebalanced {rebalanced}"
        );

        YearlyPortfolioResult {
            starting_value,
            ending_value,
            investment_return,
            cash_flow,
            rebalanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::strategy::LiquidityAwareFlowStrategy;
    use crate::profile::{AssetClass, LiquidityLevel, PortfolioConfiguration};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn profile(net_worth: i64, enable_rebalancing: bool) -> UserProfile {
        let portfolio = PortfolioConfiguration::new(
            vec![
                AssetClass::new("cash", dec(10), dec(1), Decimal::ZERO, LiquidityLevel::High)
                    .unwrap(),
                AssetClass::new("stocks", dec(60), dec(7), dec(15), LiquidityLevel::Low).unwrap(),
                AssetClass::new("bonds", dec(30), dec(3), dec(5), LiquidityLevel::Medium).unwrap(),
            ],
            enable_rebalancing,
        )
        .unwrap();
        UserProfile::new(
            1990,
            2024,
            50,
            Some(65),
            85,
            dec(net_worth),
            Decimal::new(3, 2),
            12,
            Decimal::new(2, 2),
            portfolio,
        )
        .unwrap()
    }

    fn simulator(net_worth: i64, enable_rebalancing: bool) -> PortfolioSimulator {
        let p = profile(net_worth, enable_rebalancing);
        let strategy = LiquidityAwareFlowStrategy::new(p.portfolio().clone(), 12);
        PortfolioSimulator::new(&p, Box::new(strategy))
    }

    #[test]
    fn test_initial_distribution() {
        let sim = simulator(100_000, true);
        assert_eq!(sim.state().value("cash"), dec(10_000));
        assert_eq!(sim.state().value("stocks"), dec(60_000));
        assert_eq!(sim.state().value("bonds"), dec(30_000));
    }

    #[test]
    fn test_year_with_positive_cash_flow() {
        let mut sim = simulator(100_000, true);
        let result = sim.simulate_year(34, dec(30_000), dec(50_000));

        // 5.2% blended return, then 30,000 invested
        assert_eq!(result.investment_return, dec(5_200));
        assert_eq!(result.ending_value, dec(135_200));
        assert!(result.ending_value > result.starting_value);
    }

    #[test]
    fn test_year_with_negative_cash_flow() {
        let mut sim = simulator(100_000, false);
        let result = sim.simulate_year(55, dec(-20_000), dec(50_000));
        assert_eq!(result.ending_value, dec(85_200));
        let sold: Decimal = result.cash_flow.values().copied().sum();
        assert_eq!(sold, dec(-20_000));
    }

    #[test]
    fn test_depletion_floors_assets_at_zero() {
        let mut sim = simulator(10_000, false);
        let result = sim.simulate_year(55, dec(-50_000), dec(50_000));
        assert_eq!(result.ending_value, Decimal::ZERO);
        assert!(sim.state().values().values().all(|v| *v >= Decimal::ZERO));
    }

    #[test]
    fn test_reset_to_initial() {
        let mut sim = simulator(100_000, true);
        let first = sim.simulate_year(34, dec(30_000), dec(50_000));
        sim.reset_to_initial();
        let second = sim.simulate_year(34, dec(30_000), dec(50_000));
        assert_eq!(first.ending_value, second.ending_value);
        assert_eq!(first.cash_flow, second.cash_flow);
    }

    #[test]
    fn test_rebalance_restores_target() {
        let mut sim = simulator(100_000, true);
        // Large expense drains cash and bonds, drifting well past 5%
        let result = sim.simulate_year(55, dec(-40_000), dec(50_000));
        assert!(result.rebalanced);

        let allocation = sim.state().allocation();
        assert_eq!(allocation["stocks"], Decimal::new(60, 2));
        assert_eq!(allocation["bonds"], Decimal::new(30, 2));
    }
}
