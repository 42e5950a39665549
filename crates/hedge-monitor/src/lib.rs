//! Logging setup for the backtest tooling.

mod logging;

pub use logging::setup_logging;
