//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hedge")]
#[command(author, version, about = "Leveraged crypto backtesting with pluggable decision sources")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PriceSource {
    Hyperliquid,
    Binance,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtesting simulation
    Backtest(BacktestArgs),
    /// Make a single trading decision for today
    Decide(DecideArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Crypto symbol to trade (e.g. BTC)
    #[arg(long)]
    pub crypto: String,

    /// Start date (YYYY-MM-DD); defaults to 30 days before the end date
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Initial capital; defaults to the configured default_capital
    #[arg(long)]
    pub initial_capital: Option<f64>,

    /// Trading leverage; defaults to the configured default_leverage
    #[arg(long)]
    pub leverage: Option<f64>,

    /// Proportion of the balance that can be lost per trade; defaults
    /// to the configured default_risk
    #[arg(long)]
    pub risk: Option<f64>,

    /// Replay decisions from a JSON file instead of calling the LLM
    #[arg(long)]
    pub decisions: Option<PathBuf>,

    /// Load prices from a CSV file instead of the HTTP provider
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Price provider to query when no CSV file is given
    #[arg(long, value_enum, default_value = "hyperliquid")]
    pub source: PriceSource,

    /// Dump agent reasoning to the log
    #[arg(long)]
    pub show_reasoning: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the full report as JSON to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct DecideArgs {
    /// Crypto symbol to trade (e.g. BTC)
    #[arg(long)]
    pub crypto: String,

    /// Start of the lookback window (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// End of the lookback window (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Price provider to query
    #[arg(long, value_enum, default_value = "hyperliquid")]
    pub source: PriceSource,

    /// Balance available to trade; defaults to the configured
    /// default_capital
    #[arg(long)]
    pub balance: Option<f64>,

    /// Trading leverage; defaults to the configured default_leverage
    #[arg(long)]
    pub leverage: Option<f64>,

    /// Proportion of the balance that can be lost per trade; defaults
    /// to the configured default_risk
    #[arg(long)]
    pub risk: Option<f64>,

    /// Dump agent reasoning to the log
    #[arg(long)]
    pub show_reasoning: bool,
}
