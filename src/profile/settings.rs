//! Monte Carlo simulation settings

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Configuration for a Monte Carlo run
///
/// Volatilities and factors live in the randomness domain and stay `f64`;
/// they scale noise draws, not money directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of scenarios to evaluate
    pub num_simulations: usize,

    /// Confidence level for the reported tail value, [0.5, 0.99]
    pub confidence_level: f64,

    /// Whether to trigger black swan events per scenario
    pub include_black_swan_events: bool,

    /// Standard deviation of the pre-FIRE income noise factor, [0, 1]
    pub income_base_volatility: f64,

    /// Standard deviation of the expense noise factor, [0, 1]
    pub expense_base_volatility: f64,

    /// Floor for the income noise factor, [0.01, 1]
    pub income_minimum_factor: f64,

    /// Floor for the expense noise factor, [0.1, 1]
    pub expense_minimum_factor: f64,

    /// Scenario-loop cadence for progress logging and cancellation checks
    pub yield_interval: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            confidence_level: 0.95,
            include_black_swan_events: true,
            income_base_volatility: 0.10,
            expense_base_volatility: 0.05,
            income_minimum_factor: 0.10,
            expense_minimum_factor: 0.50,
            yield_interval: 250,
        }
    }
}

impl SimulationSettings {
    /// Fail-fast range validation; rejected settings are never retried
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_simulations == 0 {
            return Err(ValidationError::NonPositiveInterval {
                field: "num_simulations",
            });
        }
        if self.yield_interval == 0 {
            return Err(ValidationError::NonPositiveInterval {
                field: "yield_interval",
            });
        }

        let ranges: [(&'static str, f64, f64, f64); 5] = [
            ("confidence_level", self.confidence_level, 0.5, 0.99),
            ("income_base_volatility", self.income_base_volatility, 0.0, 1.0),
            ("expense_base_volatility", self.expense_base_volatility, 0.0, 1.0),
            ("income_minimum_factor", self.income_minimum_factor, 0.01, 1.0),
            ("expense_minimum_factor", self.expense_minimum_factor, 0.1, 1.0),
        ];
        for (field, value, min, max) in ranges {
            if !(min..=max).contains(&value) {
                return Err(ValidationError::SettingsOutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        assert!(SimulationSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let settings = SimulationSettings {
            num_simulations: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::NonPositiveInterval { .. })
        ));
    }

    #[test]
    fn test_confidence_range() {
        let settings = SimulationSettings {
            confidence_level: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::SettingsOutOfRange {
                field: "confidence_level",
                ..
            })
        ));
    }

    #[test]
    fn test_minimum_factor_range() {
        let settings = SimulationSettings {
            income_minimum_factor: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
