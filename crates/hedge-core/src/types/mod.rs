//! Core data types for the backtesting system.

mod bar;
mod decision;
mod ledger;

pub use bar::{Bar, PriceSeries};
pub use decision::{Decision, Execution, SkipReason, TradeAction};
pub use ledger::{LedgerSnapshot, PortfolioLedger};
