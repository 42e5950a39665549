//! Risk management for the backtesting system.
//!
//! Converts a price history into a maximum tradable notional and
//! symmetric stop-loss/take-profit bands sized by leveraged volatility.

mod engine;
mod volatility;

pub use engine::{RiskAssessment, RiskEngine};
pub use volatility::rolling_std;
