//! Distribution statistics over simulated outcomes

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// Statistical summary of a sample of decimal values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistributionStats {
    /// Mean value
    pub mean: Decimal,
    /// Median (50th percentile)
    pub median: Decimal,
    /// Population standard deviation
    pub std_dev: Decimal,
    /// Minimum value
    pub min: Decimal,
    /// Maximum value
    pub max: Decimal,
    /// 5th percentile
    pub percentile_5: Decimal,
    /// 25th percentile
    pub percentile_25: Decimal,
    /// 75th percentile
    pub percentile_75: Decimal,
    /// 95th percentile
    pub percentile_95: Decimal,
}

impl DistributionStats {
    /// Summarize a sample; an empty sample yields all zeros
    pub fn from_values(values: &[Decimal]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len();
        let mut sorted = values.to_vec();
        sorted.sort();

        let sum: Decimal = values.iter().copied().sum();
        let mean = sum / Decimal::from(n as u64);

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / Decimal::TWO
        } else {
            sorted[n / 2]
        };

        let variance: Decimal = values
            .iter()
            .map(|v| {
                let d = *v - mean;
                d * d
            })
            .sum::<Decimal>()
            / Decimal::from(n as u64);
        let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);

        Self {
            mean,
            median,
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
            percentile_5: percentile_sorted(&sorted, 5.0),
            percentile_25: percentile_sorted(&sorted, 25.0),
            percentile_75: percentile_sorted(&sorted, 75.0),
            percentile_95: percentile_sorted(&sorted, 95.0),
        }
    }

    /// Coefficient of variation; treated as 1 (no stability credit) when
    /// the mean is not positive
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean <= Decimal::ZERO {
            return 1.0;
        }
        let std_dev = self.std_dev.to_f64().unwrap_or(0.0);
        let mean = self.mean.to_f64().unwrap_or(1.0);
        std_dev / mean
    }
}

/// Nearest-rank percentile over an already-sorted sample
pub fn percentile_sorted(sorted: &[Decimal], p: f64) -> Decimal {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    let idx = ((sorted.len() as f64 * p / 100.0) as usize).min(sorted.len() - 1);
    sorted[idx]
}
