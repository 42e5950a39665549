//! Backtest engine: a sequential state machine over simulated dates.

use chrono::{Duration, NaiveDate};
use hedge_core::error::{DecisionError, EngineError, EngineResult};
use hedge_core::traits::{DecisionSource, PriceProvider};
use hedge_core::types::{Decision, PortfolioLedger};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::report::BacktestReport;
use crate::statistics::{StepRecord, ValueRecord};

/// Backtest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Asset symbol to trade
    pub symbol: String,
    /// First simulated date (inclusive)
    pub start: NaiveDate,
    /// Last simulated date (inclusive)
    pub end: NaiveDate,
    /// Starting cash
    pub initial_capital: f64,
    /// Leverage multiplier, > 0
    pub leverage: f64,
    /// Fraction of the balance riskable per trade, in (0, 1]
    pub risk_fraction: f64,
    /// Days of history fetched before each simulated date
    pub lookback_days: i64,
}

impl BacktestConfig {
    /// Create a config with the conventional defaults (100k capital,
    /// 10x leverage, 5% risk, 30-day lookback).
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            initial_capital: 100_000.0,
            leverage: 10.0,
            risk_fraction: 0.05,
            lookback_days: 30,
        }
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start > self.end {
            return Err(EngineError::Config(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        if self.initial_capital <= 0.0 {
            return Err(EngineError::Config(
                "initial capital must be positive".into(),
            ));
        }
        if self.leverage <= 0.0 {
            return Err(EngineError::Config("leverage must be positive".into()));
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(EngineError::Config(
                "risk fraction must be in (0, 1]".into(),
            ));
        }
        if self.lookback_days <= 0 {
            return Err(EngineError::Config("lookback days must be positive".into()));
        }
        Ok(())
    }
}

/// Shared flag to stop a run at the next date boundary.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop after the current step.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives the per-date simulation loop.
///
/// Strictly sequential: each step depends on the ledger state left by the
/// previous one, so dates are never processed concurrently. The ledger is
/// owned here for the duration of a run.
pub struct BacktestEngine {
    config: BacktestConfig,
    stop: StopFlag,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            stop: StopFlag::new(),
        }
    }

    /// Handle for stopping the run from another task.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Run the simulation over the configured date range.
    ///
    /// Per date: fetch the lookback window, liquidate at the current
    /// price, ask the decision source, apply the decision, mark to
    /// market. A malformed decision becomes a hold; any other failure
    /// aborts the run. A stop request ends the loop at the next date
    /// boundary and yields the partial history.
    pub async fn run(
        &self,
        prices: &dyn PriceProvider,
        decisions: &dyn DecisionSource,
    ) -> EngineResult<BacktestReport> {
        self.config.validate()?;

        let mut ledger = PortfolioLedger::new(
            self.config.initial_capital,
            self.config.leverage,
            self.config.risk_fraction,
        );
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut values: Vec<ValueRecord> = Vec::new();

        info!(
            symbol = %self.config.symbol,
            start = %self.config.start,
            end = %self.config.end,
            capital = self.config.initial_capital,
            "starting backtest"
        );

        for date in self
            .config
            .start
            .iter_days()
            .take_while(|d| *d <= self.config.end)
        {
            if self.stop.is_stopped() {
                warn!(%date, "stop requested, ending run early");
                break;
            }

            let lookback_start = date - Duration::days(self.config.lookback_days);
            let series = prices
                .fetch(&self.config.symbol, lookback_start, date)
                .await?;
            // A zero close would turn the collateral division into
            // infinity, so it is as fatal as an empty window.
            let current_price = series
                .last_close()
                .filter(|price| *price > 0.0)
                .ok_or(EngineError::NoPriceData { date })?;

            ledger.liquidate(current_price);

            let snapshot = ledger.snapshot();
            let decision = match decisions
                .decide(&self.config.symbol, lookback_start, date, &snapshot)
                .await
            {
                Ok(decision) if decision.quantity.is_finite() && decision.quantity >= 0.0 => {
                    decision
                }
                Ok(decision) => {
                    warn!(%date, quantity = decision.quantity, "invalid quantity, holding");
                    Decision::hold()
                }
                Err(DecisionError::Malformed(msg)) => {
                    warn!(%date, error = %msg, "malformed decision, holding");
                    Decision::hold()
                }
                Err(err) => return Err(err.into()),
            };

            let execution = ledger.open(decision.action, decision.quantity, current_price);
            let value = ledger.mark_to_market(current_price);

            info!(
                %date,
                symbol = %self.config.symbol,
                action = %decision.action,
                quantity = execution.requested(),
                filled = execution.is_filled(),
                price = current_price,
                cash = ledger.cash(),
                collateral_long = ledger.collateral_long(),
                collateral_short = ledger.collateral_short(),
                value,
                "step"
            );

            steps.push(StepRecord {
                date,
                action: decision.action,
                requested_quantity: execution.requested(),
                filled: execution.is_filled(),
                price: current_price,
                cash: ledger.cash(),
                collateral_long: ledger.collateral_long(),
                collateral_short: ledger.collateral_short(),
                value,
            });
            values.push(ValueRecord { date, value });
        }

        Ok(BacktestReport {
            config: self.config.clone(),
            steps,
            values,
            final_ledger: ledger.snapshot(),
        })
    }
}
