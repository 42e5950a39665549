//! Performance statistics over the recorded value history.

use chrono::NaiveDate;
use hedge_core::error::StatsError;
use hedge_core::types::TradeAction;
use serde::{Deserialize, Serialize};

/// Annualization factor for daily returns.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Portfolio value at the end of one simulated date. Append-only,
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Full state of one simulated step, for the trade log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub date: NaiveDate,
    pub action: TradeAction,
    /// Quantity the decision asked for
    pub requested_quantity: f64,
    /// Whether cash actually moved
    pub filled: bool,
    pub price: f64,
    pub cash: f64,
    pub collateral_long: f64,
    pub collateral_short: f64,
    pub value: f64,
}

/// Risk-adjusted performance metrics for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    /// Annualized mean/stdev of daily returns
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough decline, <= 0
    pub max_drawdown: f64,
    /// Number of daily returns behind the Sharpe ratio
    pub samples: usize,
}

/// Computes return, Sharpe ratio, and max drawdown from a value history.
/// Pure; never mutates its input.
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    /// Analyze a chronological value history.
    ///
    /// Needs at least 2 daily returns (3 value records) and non-zero
    /// return dispersion, otherwise the Sharpe ratio is undefined.
    pub fn analyze(
        values: &[ValueRecord],
        initial_capital: f64,
        final_value: f64,
    ) -> Result<PerformanceSummary, StatsError> {
        let daily_returns: Vec<f64> = values
            .windows(2)
            .map(|w| w[1].value / w[0].value - 1.0)
            .collect();

        if daily_returns.len() < 2 {
            return Err(StatsError::InsufficientSamples {
                required: 2,
                available: daily_returns.len(),
            });
        }

        let n = daily_returns.len() as f64;
        let mean = daily_returns.iter().sum::<f64>() / n;
        let variance = daily_returns
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return Err(StatsError::ZeroDispersion);
        }

        let sharpe_ratio = mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt();

        let mut running_max = f64::MIN;
        let mut max_drawdown: f64 = 0.0;
        for record in values {
            running_max = running_max.max(record.value);
            max_drawdown = max_drawdown.min(record.value / running_max - 1.0);
        }

        Ok(PerformanceSummary {
            total_return: (final_value - initial_capital) / initial_capital,
            sharpe_ratio,
            max_drawdown,
            samples: daily_returns.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(values: &[f64]) -> Vec<ValueRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| ValueRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                value,
            })
            .collect()
    }

    #[test]
    fn test_sharpe_and_drawdown() {
        let values = records(&[100_000.0, 101_000.0, 99_000.0, 102_000.0]);
        let summary = PerformanceAnalyzer::analyze(&values, 100_000.0, 102_000.0).unwrap();

        assert!((summary.total_return - 0.02).abs() < 1e-12);
        // daily returns [0.01, -0.019802, 0.030303]
        assert!((summary.max_drawdown - (99_000.0 / 101_000.0 - 1.0)).abs() < 1e-12);
        assert!((summary.sharpe_ratio - 4.3044).abs() < 1e-3);
        assert_eq!(summary.samples, 3);
    }

    #[test]
    fn test_monotonic_series_has_zero_drawdown() {
        let values = records(&[100.0, 105.0, 110.0, 120.0]);
        let summary = PerformanceAnalyzer::analyze(&values, 100.0, 120.0).unwrap();

        assert_eq!(summary.max_drawdown, 0.0);
        assert!((summary.total_return - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_samples() {
        let values = records(&[100.0, 101.0]);
        let err = PerformanceAnalyzer::analyze(&values, 100.0, 101.0).unwrap_err();

        assert_eq!(
            err,
            StatsError::InsufficientSamples {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_flat_series_is_degenerate() {
        let values = records(&[100.0, 100.0, 100.0]);
        let err = PerformanceAnalyzer::analyze(&values, 100.0, 100.0).unwrap_err();
        assert_eq!(err, StatsError::ZeroDispersion);
    }
}
