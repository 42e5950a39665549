//! Backtest report generation.

use hedge_core::error::StatsError;
use hedge_core::types::LedgerSnapshot;
use serde::{Deserialize, Serialize};

use crate::statistics::{PerformanceAnalyzer, PerformanceSummary, StepRecord, ValueRecord};
use crate::BacktestConfig;

/// Complete backtest report: the configuration, the per-date trade log,
/// the value curve, and the final ledger state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub config: BacktestConfig,
    pub steps: Vec<StepRecord>,
    pub values: Vec<ValueRecord>,
    pub final_ledger: LedgerSnapshot,
}

impl BacktestReport {
    /// Risk-adjusted metrics for the run.
    pub fn performance(&self) -> Result<PerformanceSummary, StatsError> {
        PerformanceAnalyzer::analyze(
            &self.values,
            self.config.initial_capital,
            self.final_ledger.portfolio_value,
        )
    }

    /// Generate the text trade log and metrics summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(&format!(
            "{:<12} {:<8} {:<8} {:>12} {:>10} {:>14} {:>16} {:>16} {:>14}\n",
            "Date",
            "Symbol",
            "Action",
            "Quantity",
            "Price",
            "Cash",
            "Coll. long",
            "Coll. short",
            "Total Value"
        ));
        s.push_str(&"-".repeat(118));
        s.push('\n');

        for step in &self.steps {
            let action = if step.filled {
                step.action.to_string()
            } else {
                format!("{}*", step.action)
            };
            s.push_str(&format!(
                "{:<12} {:<8} {:<8} {:>12.2} {:>10.2} {:>14.2} {:>16.4} {:>16.4} {:>14.2}\n",
                step.date.to_string(),
                self.config.symbol,
                action,
                step.requested_quantity,
                step.price,
                step.cash,
                step.collateral_long,
                step.collateral_short,
                step.value,
            ));
        }

        s.push('\n');
        match self.performance() {
            Ok(perf) => {
                s.push_str(&format!("Total Return:     {:>8.2}%\n", perf.total_return * 100.0));
                s.push_str(&format!("Sharpe Ratio:     {:>8.2}\n", perf.sharpe_ratio));
                s.push_str(&format!(
                    "Maximum Drawdown: {:>8.2}%\n",
                    perf.max_drawdown * 100.0
                ));
            }
            Err(err) => {
                s.push_str(&format!("Performance metrics unavailable: {err}\n"));
            }
        }

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the value curve to CSV.
    pub fn values_to_csv(&self) -> String {
        let mut csv = String::from("date,portfolio_value\n");
        for record in &self.values {
            csv.push_str(&format!("{},{}\n", record.date, record.value));
        }
        csv
    }
}
