//! Backtesting engine.

mod engine;
mod report;
mod statistics;

pub use engine::{BacktestConfig, BacktestEngine, StopFlag};
pub use report::BacktestReport;
pub use statistics::{PerformanceAnalyzer, PerformanceSummary, StepRecord, ValueRecord};
