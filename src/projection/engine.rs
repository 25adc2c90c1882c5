//! Core FIRE engine: yearly loop with depletion/debt tracking
//!
//! The engine runs a deterministic full-horizon pass over the pre-computed
//! annual projection. Per year the plan is either Solvent (positive
//! portfolio value) or Depleted (value at zero, shortfalls accumulating as
//! debt); income recovery in a later year moves it back to Solvent. There
//! is no terminal state.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::buffer::required_buffer_months;
use super::state::{FireCalculationResult, YearlyState};
use crate::portfolio::{LiquidityAwareFlowStrategy, PortfolioSimulator};
use crate::profile::UserProfile;

const TWELVE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const TWENTY_FIVE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// One row of the externally-assembled annual projection
///
/// Income and expense arrive final: growth and inflation adjustments are
/// the planner's job, not the engine's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub age: u8,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Everything one deterministic run consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInput {
    pub profile: UserProfile,
    pub projection: Vec<ProjectionRow>,
}

/// Deterministic year-by-year FIRE engine
///
/// Owns a mutable portfolio simulator internally but resets it before each
/// run, so `calculate` and `yearly_states` are pure from the caller's
/// viewpoint.
pub struct FireEngine {
    profile: UserProfile,
    projection: Vec<ProjectionRow>,
    simulator: PortfolioSimulator,
    accumulated_debt: Decimal,
}

impl FireEngine {
    pub fn new(input: EngineInput) -> Self {
        let EngineInput {
            profile,
            projection,
        } = input;
        let strategy = LiquidityAwareFlowStrategy::new(
            profile.portfolio().clone(),
            profile.safety_buffer_months(),
        );
        let simulator = PortfolioSimulator::new(&profile, Box::new(strategy));

        Self {
            profile,
            projection,
            simulator,
            accumulated_debt: Decimal::ZERO,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn projection(&self) -> &[ProjectionRow] {
        &self.projection
    }

    /// Simulate one year and derive its sustainability metrics
    fn calculate_single_year(&mut self, row: &ProjectionRow) -> YearlyState {
        let net_cash_flow = row.total_income - row.total_expense;
        let result = self
            .simulator
            .simulate_year(row.age, net_cash_flow, row.total_expense);

        let portfolio_value = result.ending_value;

        // Depletion/debt transitions. Debt is a running unfunded-shortfall
        // sum, not a loan balance; it does not accrue interest.
        let net_worth = if portfolio_value > Decimal::ZERO {
            self.accumulated_debt = Decimal::ZERO;
            portfolio_value
        } else {
            if net_cash_flow < Decimal::ZERO {
                let funded = result.starting_value + result.investment_return;
                let shortfall = -net_cash_flow - funded;
                if shortfall > Decimal::ZERO {
                    self.accumulated_debt += shortfall;
                }
            }
            -self.accumulated_debt
        };

        let buffer_months = required_buffer_months(&self.profile, row.age);
        let safety_buffer_amount = row.total_expense * buffer_months / TWELVE;

        let fire_number = row.total_expense * TWENTY_FIVE;
        let fire_progress = if fire_number > Decimal::ZERO {
            portfolio_value / fire_number
        } else {
            Decimal::ZERO
        };

        YearlyState {
            age: row.age,
            year: row.year,
            income: row.total_income,
            expense: row.total_expense,
            net_cash_flow,
            portfolio_value,
            net_worth,
            investment_return: result.investment_return,
            is_sustainable: net_worth >= safety_buffer_amount,
            fire_number,
            fire_progress,
            safety_buffer_amount,
        }
    }

    /// Full-horizon per-year trace; resets internal state first
    pub fn yearly_states(&mut self) -> Vec<YearlyState> {
        self.simulator.reset_to_initial();
        self.accumulated_debt = Decimal::ZERO;

        let rows = self.projection.clone();
        rows.iter().map(|row| self.calculate_single_year(row)).collect()
    }

    /// Run the full horizon and summarize
    pub fn calculate(&mut self) -> FireCalculationResult {
        let states = self.yearly_states();
        if states.is_empty() {
            return FireCalculationResult::empty();
        }

        // Strict whole-horizon requirement, not just at the FIRE age
        let is_fire_achievable = states.iter().all(|s| s.is_sustainable);

        let fire_age = self.profile.expected_fire_age();
        let fire_index = states
            .iter()
            .position(|s| s.age >= fire_age)
            .unwrap_or(states.len() - 1);

        let fire_net_worth = states[fire_index].net_worth;
        let min_net_worth_after_fire = states[fire_index..]
            .iter()
            .map(|s| s.net_worth)
            .min()
            .unwrap_or(Decimal::ZERO);
        let final_net_worth = states.last().map(|s| s.net_worth).unwrap_or(Decimal::ZERO);

        let min_safety_buffer_ratio = states
            .iter()
            .filter(|s| s.safety_buffer_amount > Decimal::ZERO)
            .map(|s| s.net_worth / s.safety_buffer_amount)
            .min()
            .unwrap_or(Decimal::ZERO);

        let early_years = states.len().min(5);
        let early_expense_sum: Decimal =
            states[..early_years].iter().map(|s| s.expense).sum();
        let traditional_fire_number =
            early_expense_sum / Decimal::from(early_years as u32) * TWENTY_FIVE;
        let traditional_fire_achieved = states
            .iter()
            .any(|s| s.portfolio_value >= traditional_fire_number);

        debug!(
            "horizon {} years, achievable {}, final net worth {}",
            states.len(),
            is_fire_achievable,
            final_net_worth
        );

        FireCalculationResult {
            is_fire_achievable,
            fire_net_worth,
            min_net_worth_after_fire,
            final_net_worth,
            min_safety_buffer_ratio,
            traditional_fire_number,
            traditional_fire_achieved,
            yearly_states: states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AssetClass, LiquidityLevel, PortfolioConfiguration};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    /// Scenario profile from the reference behavior: cash 10%/1%,
    /// stocks 60%/7%, bonds 30%/3%, net worth 100,000
    fn scenario_profile() -> UserProfile {
        let portfolio = PortfolioConfiguration::new(
            vec![
                AssetClass::new("cash", dec(10), dec(1), Decimal::ZERO, LiquidityLevel::High)
                    .unwrap(),
                AssetClass::new("stocks", dec(60), dec(7), dec(15), LiquidityLevel::Low).unwrap(),
                AssetClass::new("bonds", dec(30), dec(3), dec(5), LiquidityLevel::Medium).unwrap(),
            ],
            true,
        )
        .unwrap();
        UserProfile::new(
            1990,
            2024,
            50,
            Some(65),
            85,
            dec(100_000),
            Decimal::new(3, 2),
            12,
            Decimal::new(2, 2),
            portfolio,
        )
        .unwrap()
    }

    fn flat_projection(years: usize) -> Vec<ProjectionRow> {
        (0..years)
            .map(|i| ProjectionRow {
                age: 34 + i as u8,
                year: 2024 + i as i32,
                total_income: dec(80_000 + 2_000 * i as i64),
                total_expense: dec(50_000),
            })
            .collect()
    }

    #[test]
    fn test_portfolio_grows_with_surplus() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: flat_projection(5),
        });
        let states = engine.yearly_states();

        assert_eq!(states.len(), 5);
        let mut previous = dec(100_000);
        for state in &states {
            assert!(
                state.portfolio_value > previous,
                "year {} did not grow: {} <= {}",
                state.year,
                state.portfolio_value,
                previous
            );
            previous = state.portfolio_value;
        }
    }

    #[test]
    fn test_achievable_iff_every_year_sustainable() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: flat_projection(5),
        });
        let result = engine.calculate();
        assert_eq!(
            result.is_fire_achievable,
            result.yearly_states.iter().all(|s| s.is_sustainable)
        );
    }

    #[test]
    fn test_engine_is_pure_across_runs() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: flat_projection(10),
        });
        let first = engine.calculate();
        let second = engine.calculate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_debt_accumulates_without_interest() {
        // Tiny portfolio, deep deficit every year
        let portfolio = PortfolioConfiguration::new(
            vec![AssetClass::new(
                "cash",
                Decimal::ONE_HUNDRED,
                Decimal::ZERO,
                Decimal::ZERO,
                LiquidityLevel::High,
            )
            .unwrap()],
            false,
        )
        .unwrap();
        let profile = UserProfile::new(
            1990,
            2024,
            50,
            Some(65),
            85,
            dec(10_000),
            Decimal::new(3, 2),
            12,
            Decimal::ZERO,
            portfolio,
        )
        .unwrap();
        let projection = vec![
            ProjectionRow {
                age: 34,
                year: 2024,
                total_income: Decimal::ZERO,
                total_expense: dec(30_000),
            },
            ProjectionRow {
                age: 35,
                year: 2025,
                total_income: Decimal::ZERO,
                total_expense: dec(30_000),
            },
        ];

        let mut engine = FireEngine::new(EngineInput {
            profile,
            projection,
        });
        let states = engine.yearly_states();

        // Year 1: 30,000 due, 10,000 funded, 20,000 shortfall
        assert_eq!(states[0].portfolio_value, Decimal::ZERO);
        assert_eq!(states[0].net_worth, dec(-20_000));
        // Year 2: nothing funded, full 30,000 adds on (no interest on debt)
        assert_eq!(states[1].net_worth, dec(-50_000));
        assert!(!states[1].is_sustainable);
    }

    #[test]
    fn test_depleted_recovers_on_income() {
        let portfolio = PortfolioConfiguration::new(
            vec![AssetClass::new(
                "cash",
                Decimal::ONE_HUNDRED,
                Decimal::ZERO,
                Decimal::ZERO,
                LiquidityLevel::High,
            )
            .unwrap()],
            false,
        )
        .unwrap();
        let profile = UserProfile::new(
            1990,
            2024,
            50,
            None,
            85,
            dec(5_000),
            Decimal::new(3, 2),
            12,
            Decimal::ZERO,
            portfolio,
        )
        .unwrap();
        let projection = vec![
            ProjectionRow {
                age: 34,
                year: 2024,
                total_income: Decimal::ZERO,
                total_expense: dec(20_000),
            },
            ProjectionRow {
                age: 35,
                year: 2025,
                total_income: dec(100_000),
                total_expense: dec(20_000),
            },
        ];

        let mut engine = FireEngine::new(EngineInput {
            profile,
            projection,
        });
        let states = engine.yearly_states();

        assert!(states[0].net_worth < Decimal::ZERO);
        // Income year: portfolio positive again, debt resets
        assert!(states[1].portfolio_value > Decimal::ZERO);
        assert_eq!(states[1].net_worth, states[1].portfolio_value);
    }

    #[test]
    fn test_fire_number_and_progress() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: flat_projection(1),
        });
        let states = engine.yearly_states();
        assert_eq!(states[0].fire_number, dec(1_250_000));
        assert_eq!(
            states[0].fire_progress,
            states[0].portfolio_value / dec(1_250_000)
        );
    }

    #[test]
    fn test_zero_expense_guards_division() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: vec![ProjectionRow {
                age: 34,
                year: 2024,
                total_income: dec(10_000),
                total_expense: Decimal::ZERO,
            }],
        });
        let states = engine.yearly_states();
        assert_eq!(states[0].fire_progress, Decimal::ZERO);
        assert_eq!(states[0].safety_buffer_amount, Decimal::ZERO);
    }

    #[test]
    fn test_empty_projection() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: Vec::new(),
        });
        let result = engine.calculate();
        assert!(!result.is_fire_achievable);
        assert!(result.yearly_states.is_empty());
    }

    #[test]
    fn test_traditional_fire_number_from_first_five_years() {
        let mut engine = FireEngine::new(EngineInput {
            profile: scenario_profile(),
            projection: flat_projection(8),
        });
        let result = engine.calculate();
        // Flat 50,000 expenses: 25 × 50,000
        assert_eq!(result.traditional_fire_number, dec(1_250_000));
    }
}
