//! Mutable per-scenario portfolio state
//!
//! Exclusively owned by one `PortfolioSimulator` per scenario; never shared
//! across concurrent scenario evaluations.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mapping of normalized asset name to current value
///
/// A `BTreeMap` keeps iteration order deterministic, which seeded runs
/// depend on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioState {
    values: BTreeMap<String, Decimal>,
}

impl PortfolioState {
    pub fn new(values: BTreeMap<String, Decimal>) -> Self {
        Self { values }
    }

    /// Distribute a total value across assets according to target ratios
    pub fn from_allocation(total: Decimal, target: &BTreeMap<String, Decimal>) -> Self {
        let values = target
            .iter()
            .map(|(name, ratio)| (name.clone(), total * *ratio))
            .collect();
        Self { values }
    }

    pub fn total_value(&self) -> Decimal {
        self.values.values().copied().sum()
    }

    pub fn value(&self, name: &str) -> Decimal {
        self.values.get(name).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn values(&self) -> &BTreeMap<String, Decimal> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current allocation ratios
    ///
    /// Ratios always sum to exactly 1 after the residual correction below.
    /// An empty or all-zero portfolio yields all-zero ratios.
    pub fn allocation(&self) -> BTreeMap<String, Decimal> {
        let total = self.total_value();
        if total <= Decimal::ZERO {
            return self
                .values
                .keys()
                .map(|name| (name.clone(), Decimal::ZERO))
                .collect();
        }

        let mut ratios: BTreeMap<String, Decimal> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), *value / total))
            .collect();

        // Fold the division residual into the largest position
        let sum: Decimal = ratios.values().copied().sum();
        let residual = Decimal::ONE - sum;
        if residual != Decimal::ZERO {
            if let Some(largest) = self
                .values
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
                .map(|(name, _)| name.clone())
            {
                if let Some(ratio) = ratios.get_mut(&largest) {
                    *ratio += residual;
                }
            }
        }

        ratios
    }

    /// Grow every position proportionally so the total changes by `amount`
    pub fn apply_proportional_return(&mut self, amount: Decimal) {
        let total = self.total_value();
        if total <= Decimal::ZERO || amount == Decimal::ZERO {
            return;
        }
        let factor = (total + amount) / total;
        for value in self.values.values_mut() {
            *value *= factor;
        }
    }

    /// Apply per-asset deltas, flooring every individual position at zero
    ///
    /// Aggregate net worth may go negative, but only via the engine's
    /// separate debt tracker; no asset value ever does.
    pub fn apply_deltas(&mut self, deltas: &BTreeMap<String, Decimal>) {
        for (name, delta) in deltas {
            let entry = self.values.entry(name.clone()).or_insert(Decimal::ZERO);
            *entry = (*entry + *delta).max(Decimal::ZERO);
        }
    }

    /// Overwrite positions with target values (exact rebalancing)
    pub fn set_values(&mut self, values: BTreeMap<String, Decimal>) {
        self.values = values;
    }
}
