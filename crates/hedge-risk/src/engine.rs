//! Position-sizing risk engine.

use hedge_core::error::RiskError;
use hedge_core::types::PriceSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::volatility::{mean, rolling_std};

/// Default rolling window: 24 hourly bars.
pub const DEFAULT_WINDOW: usize = 24;

/// Risk limits derived from recent price volatility.
///
/// Computed fresh per invocation; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Mean rolling standard deviation of returns
    pub volatility: f64,
    /// Maximum margin for a new position, cash-capped and de-leveraged
    pub max_position_margin: f64,
    /// Stop-loss band as a fraction of entry
    pub stop_loss_pct: f64,
    /// Take-profit band as a fraction of entry
    pub take_profit_pct: f64,
}

/// Converts a price history plus portfolio risk parameters into position
/// limits. Pure: identical inputs always yield identical output.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    window: usize,
}

impl RiskEngine {
    /// Create a risk engine with a custom rolling window.
    pub fn new(window: usize) -> Self {
        assert!(window > 1, "Window must be greater than 1");
        Self { window }
    }

    /// Assess risk limits for the given price history.
    ///
    /// Needs `window + 1` raw bars: one is consumed producing the first
    /// return, the rest fill one rolling window.
    pub fn assess(
        &self,
        prices: &PriceSeries,
        cash: f64,
        risk_fraction: f64,
        leverage: f64,
    ) -> Result<RiskAssessment, RiskError> {
        let required = self.window + 1;
        if prices.len() < required {
            return Err(RiskError::InsufficientHistory {
                required,
                available: prices.len(),
            });
        }

        if let Some(index) = prices.iter().position(|b| b.close <= 0.0) {
            return Err(RiskError::NonPositiveClose { index });
        }

        let returns = prices.returns();
        let volatility = mean(&rolling_std(&returns, self.window));

        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(RiskError::DegenerateVolatility);
        }

        let max_loss_cash = cash * risk_fraction;
        let max_position_size = (max_loss_cash / volatility).min(cash);
        let max_position_margin = max_position_size / leverage;
        let band = volatility * leverage;

        debug!(
            volatility,
            max_position_size, max_position_margin, "risk assessment"
        );

        Ok(RiskAssessment {
            volatility,
            max_position_margin,
            stop_loss_pct: band,
            take_profit_pct: band,
        })
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedge_core::types::Bar;

    fn series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 3_600_000, c, c, c, c, 1000.0))
            .collect();
        PriceSeries::from_bars("BTC", bars)
    }

    fn wavy_closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect()
    }

    #[test]
    fn test_margin_formula() {
        let prices = series(&wavy_closes(60));
        let engine = RiskEngine::default();
        let cash = 100_000.0;
        let assessment = engine.assess(&prices, cash, 0.05, 10.0).unwrap();

        let max_position_size = (cash * 0.05 / assessment.volatility).min(cash);
        assert!((assessment.max_position_margin - max_position_size / 10.0).abs() < 1e-9);
        assert!(assessment.volatility > 0.0);
        assert!((assessment.stop_loss_pct - assessment.volatility * 10.0).abs() < 1e-12);
        assert_eq!(assessment.stop_loss_pct, assessment.take_profit_pct);
    }

    #[test]
    fn test_size_capped_at_cash() {
        // Tiny volatility relative to risk budget forces the cash cap
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 0.0001)
            .collect();
        let prices = series(&closes);
        let assessment = RiskEngine::default()
            .assess(&prices, 100_000.0, 0.05, 10.0)
            .unwrap();

        assert!((assessment.max_position_margin - 100_000.0 / 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let prices = series(&wavy_closes(80));
        let engine = RiskEngine::default();

        let a = engine.assess(&prices, 50_000.0, 0.02, 5.0).unwrap();
        let b = engine.assess(&prices, 50_000.0, 0.02, 5.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_insufficient_history_at_24_bars() {
        // 24 bars give only 23 returns: one short of a full window
        let prices = series(&wavy_closes(24));
        let err = RiskEngine::default()
            .assess(&prices, 100_000.0, 0.05, 10.0)
            .unwrap_err();

        assert_eq!(
            err,
            RiskError::InsufficientHistory {
                required: 25,
                available: 24
            }
        );

        // 25 bars is exactly enough
        let prices = series(&wavy_closes(25));
        assert!(RiskEngine::default()
            .assess(&prices, 100_000.0, 0.05, 10.0)
            .is_ok());
    }

    #[test]
    fn test_flat_prices_degenerate_volatility() {
        let prices = series(&[100.0; 40]);
        let err = RiskEngine::default()
            .assess(&prices, 100_000.0, 0.05, 10.0)
            .unwrap_err();
        assert_eq!(err, RiskError::DegenerateVolatility);
    }

    #[test]
    fn test_non_positive_close_rejected() {
        let mut closes = wavy_closes(40);
        closes[7] = 0.0;
        let prices = series(&closes);
        let err = RiskEngine::default()
            .assess(&prices, 100_000.0, 0.05, 10.0)
            .unwrap_err();
        assert_eq!(err, RiskError::NonPositiveClose { index: 7 });
    }
}
