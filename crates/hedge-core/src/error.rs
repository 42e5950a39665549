//! Error types for the backtesting system.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("No usable price in the lookback window ending {date}")]
    NoPriceData { date: NaiveDate },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Position-sizing / volatility errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RiskError {
    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Degenerate volatility: rolling volatility of returns is zero")]
    DegenerateVolatility,

    #[error("Non-positive close at bar {index}")]
    NonPositiveClose { index: usize },
}

/// Errors from price and open-interest providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No data available for the requested range")]
    NoData,

    #[error("Provider unavailable after {attempts} attempts: {reason}")]
    Unavailable { attempts: u32, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Errors from decision sources.
///
/// A malformed decision is recoverable (the engine substitutes a hold);
/// an unavailable source is not. The two are deliberately distinct so a
/// failed source is never mistaken for a genuine hold decision.
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Malformed decision: {0}")]
    Malformed(String),

    #[error("Decision source unavailable: {0}")]
    Unavailable(String),
}

/// Performance statistics errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatsError {
    #[error("Insufficient samples: need {required} daily returns, have {available}")]
    InsufficientSamples { required: usize, available: usize },

    #[error("Daily returns have zero dispersion; Sharpe ratio is undefined")]
    ZeroDispersion,
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
