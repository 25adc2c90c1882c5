//! Seeded Monte Carlo layer over the deterministic FIRE engine
//!
//! Each scenario perturbs the base projection (income/expense noise plus
//! optional black swan events), runs a fresh engine over it, and the
//! aggregate summarizes the outcome distribution. Scenarios are independent
//! and evaluated in parallel; seeded runs derive one RNG substream per
//! scenario index so results do not depend on thread scheduling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use rayon::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, ValidationError};
use crate::events::{personalized_catalog, ActiveEventTracker, BlackSwanEvent, EventId};
use crate::montecarlo::rng::ScenarioRng;
use crate::montecarlo::stats::{percentile_sorted, DistributionStats};
use crate::profile::SimulationSettings;
use crate::projection::{EngineInput, FireEngine};

const TWELVE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Result of one perturbed scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub final_net_worth: Decimal,
    pub minimum_net_worth: Decimal,
    pub success: bool,
    pub triggered_events: Vec<EventId>,
}

/// Event-related aggregates, present when events were enabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackSwanAnalysis {
    /// Average final net worth across the worst decile of scenarios
    pub worst_decile_avg_net_worth: Decimal,

    /// Success rate within the worst decile
    pub worst_decile_success_rate: f64,

    /// How often each event triggered across all scenarios
    pub event_frequency: BTreeMap<EventId, u32>,

    /// 0–100 composite of success rate and outcome stability
    pub resilience_score: f64,

    /// Suggested emergency fund sized from the mean annual expense
    pub recommended_emergency_fund: Decimal,
}

/// Immutable aggregate statistics of one `run_simulation` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub num_simulations: usize,

    /// Share of scenarios where the plan stayed sustainable every year
    pub success_rate: f64,

    pub final_net_worth: DistributionStats,
    pub minimum_net_worth: DistributionStats,

    /// Final net worth at the configured confidence level (lower tail)
    pub final_net_worth_at_confidence: Decimal,

    pub black_swan: Option<BlackSwanAnalysis>,
}

/// Seeded scenario generator and aggregator
pub struct MonteCarloSimulator {
    input: EngineInput,
    settings: SimulationSettings,
    seed: Option<u64>,
    catalog: Vec<BlackSwanEvent>,
}

impl MonteCarloSimulator {
    /// Validates settings fail-fast; the catalog is personalized to the
    /// profile once here
    pub fn new(
        input: EngineInput,
        settings: SimulationSettings,
    ) -> Result<Self, ValidationError> {
        settings.validate()?;
        let catalog = personalized_catalog(&input.profile);
        Ok(Self {
            input,
            settings,
            seed: None,
            catalog,
        })
    }

    /// Fix the seed for bit-reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Run all scenarios and aggregate
    pub fn run_simulation(&self) -> MonteCarloResult {
        info!(
            "running {} scenarios (seed {:?}, events {})",
            self.settings.num_simulations, self.seed, self.settings.include_black_swan_events
        );
        let outcomes: Vec<ScenarioOutcome> = (0..self.settings.num_simulations)
            .into_par_iter()
            .map(|i| self.run_scenario(i))
            .collect();
        self.aggregate(&outcomes)
    }

    /// Cancellable variant: checks the token at scenario boundaries and
    /// discards partial aggregates on abort
    pub fn run_simulation_cancellable(
        &self,
        cancel: &AtomicBool,
    ) -> Result<MonteCarloResult, SimulationError> {
        let outcomes: Result<Vec<ScenarioOutcome>, SimulationError> =
            (0..self.settings.num_simulations)
                .into_par_iter()
                .map(|i| {
                    if i % self.settings.yield_interval == 0 {
                        if cancel.load(Ordering::Relaxed) {
                            return Err(SimulationError::Cancelled);
                        }
                        debug!("scenario {i} reached");
                    }
                    Ok(self.run_scenario(i))
                })
                .collect();
        Ok(self.aggregate(&outcomes?))
    }

    /// Re-run at a quarter of the scenario count per candidate value and
    /// report one success rate per variation
    pub fn analyze_sensitivity(
        &self,
        parameter: &str,
        variations: &[f64],
    ) -> Result<Vec<f64>, SimulationError> {
        let reduced = (self.settings.num_simulations / 4).max(1);
        let mut rates = Vec::with_capacity(variations.len());

        for &value in variations {
            let mut settings = self.settings.clone();
            match parameter {
                "income_volatility" => settings.income_base_volatility = value,
                "expense_volatility" => settings.expense_base_volatility = value,
                // Treated as a boolean gate on event triggering
                "black_swan_probability" => {
                    settings.include_black_swan_events = value > 0.5;
                }
                other => {
                    return Err(SimulationError::UnknownParameter(other.to_string()));
                }
            }
            settings.num_simulations = reduced;

            let variant = Self {
                input: self.input.clone(),
                settings,
                seed: self.seed,
                catalog: self.catalog.clone(),
            };
            rates.push(variant.run_simulation().success_rate);
        }

        Ok(rates)
    }

    /// Perturb the base projection and run one engine pass
    fn run_scenario(&self, index: usize) -> ScenarioOutcome {
        let mut rng = ScenarioRng::for_scenario(self.seed, index);
        let fire_age = self.input.profile.expected_fire_age();
        let mut rows = self.input.projection.clone();

        // Income noise applies to pre-FIRE years only (post-FIRE income is
        // assumed stable); expense noise applies throughout
        for row in rows.iter_mut() {
            if row.age < fire_age {
                row.total_income *= noise_factor(
                    &mut rng,
                    self.settings.income_base_volatility,
                    self.settings.income_minimum_factor,
                );
            }
            row.total_expense *= noise_factor(
                &mut rng,
                self.settings.expense_base_volatility,
                self.settings.expense_minimum_factor,
            );
        }

        let mut triggered_events = Vec::new();
        if self.settings.include_black_swan_events {
            let mut tracker = ActiveEventTracker::new();
            for row in rows.iter_mut() {
                let in_range = self
                    .catalog
                    .iter()
                    .filter(|e| e.applies_at(row.age))
                    .count();
                let draws: Vec<f64> = (0..in_range).map(|_| rng.next_f64()).collect();
                let impact = tracker.apply_year(
                    &self.catalog,
                    row.age,
                    &draws,
                    row.total_income,
                    row.total_expense,
                );
                row.total_income = impact.income;
                row.total_expense = impact.expense;
                triggered_events.extend(impact.triggered);
            }
        }

        let mut engine = FireEngine::new(EngineInput {
            profile: self.input.profile.clone(),
            projection: rows,
        });
        let result = engine.calculate();

        let minimum_net_worth = result
            .yearly_states
            .iter()
            .map(|s| s.net_worth)
            .min()
            .unwrap_or(Decimal::ZERO);

        ScenarioOutcome {
            final_net_worth: result.final_net_worth,
            minimum_net_worth,
            success: result.is_fire_achievable,
            triggered_events,
        }
    }

    fn aggregate(&self, outcomes: &[ScenarioOutcome]) -> MonteCarloResult {
        let n = outcomes.len();
        let successes = outcomes.iter().filter(|o| o.success).count();
        let success_rate = if n > 0 {
            successes as f64 / n as f64
        } else {
            0.0
        };

        let finals: Vec<Decimal> = outcomes.iter().map(|o| o.final_net_worth).collect();
        let minimums: Vec<Decimal> =
            outcomes.iter().map(|o| o.minimum_net_worth).collect();
        let final_stats = DistributionStats::from_values(&finals);
        let minimum_stats = DistributionStats::from_values(&minimums);

        let mut sorted_finals = finals;
        sorted_finals.sort();
        let tail = (1.0 - self.settings.confidence_level) * 100.0;
        let final_net_worth_at_confidence = percentile_sorted(&sorted_finals, tail);

        let black_swan = self
            .settings
            .include_black_swan_events
            .then(|| self.black_swan_analysis(outcomes, &final_stats, success_rate));

        MonteCarloResult {
            num_simulations: n,
            success_rate,
            final_net_worth: final_stats,
            minimum_net_worth: minimum_stats,
            final_net_worth_at_confidence,
            black_swan,
        }
    }

    fn black_swan_analysis(
        &self,
        outcomes: &[ScenarioOutcome],
        final_stats: &DistributionStats,
        success_rate: f64,
    ) -> BlackSwanAnalysis {
        let mut by_final: Vec<&ScenarioOutcome> = outcomes.iter().collect();
        by_final.sort_by(|a, b| a.final_net_worth.cmp(&b.final_net_worth));
        // At least one sample even below ten scenarios
        let decile_len = (by_final.len() / 10).max(1).min(by_final.len());
        let worst = &by_final[..decile_len];

        let worst_decile_avg_net_worth = if worst.is_empty() {
            Decimal::ZERO
        } else {
            worst
                .iter()
                .map(|o| o.final_net_worth)
                .sum::<Decimal>()
                / Decimal::from(worst.len() as u64)
        };
        let worst_decile_success_rate = if worst.is_empty() {
            0.0
        } else {
            worst.iter().filter(|o| o.success).count() as f64 / worst.len() as f64
        };

        let mut event_frequency: BTreeMap<EventId, u32> = BTreeMap::new();
        for outcome in outcomes {
            for id in &outcome.triggered_events {
                *event_frequency.entry(*id).or_insert(0) += 1;
            }
        }

        let stability = 1.0 - final_stats.coefficient_of_variation();
        let resilience_score =
            100.0 * (0.7 * success_rate + 0.3 * stability).clamp(0.0, 1.0);

        let mean_annual_expense = mean_expense(&self.input);
        let months = emergency_fund_months(success_rate);
        let recommended_emergency_fund =
            mean_annual_expense * Decimal::from(months) / TWELVE;

        BlackSwanAnalysis {
            worst_decile_avg_net_worth,
            worst_decile_success_rate,
            event_frequency,
            resilience_score,
            recommended_emergency_fund,
        }
    }
}

/// Emergency-fund months by success-rate band
fn emergency_fund_months(success_rate: f64) -> u32 {
    if success_rate >= 0.9 {
        6
    } else if success_rate >= 0.7 {
        12
    } else {
        18
    }
}

fn mean_expense(input: &EngineInput) -> Decimal {
    if input.projection.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = input.projection.iter().map(|r| r.total_expense).sum();
    sum / Decimal::from(input.projection.len() as u64)
}

/// Normal noise factor `1 + volatility × z`, floored at `minimum`
fn noise_factor(rng: &mut ScenarioRng, volatility: f64, minimum: f64) -> Decimal {
    let z = rng.next_normal();
    let factor = (1.0 + volatility * z).max(minimum);
    Decimal::from_f64(factor).unwrap_or(Decimal::ONE)
}
