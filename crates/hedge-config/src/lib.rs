//! Configuration management.
//!
//! An explicit configuration struct created once per process and passed
//! into provider constructors, replacing ambient environment globals.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, LlmSettings, LoggingConfig, ProviderConfig,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and `HEDGE__`-prefixed environment
/// overrides. A missing file falls back to the built-in defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("HEDGE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/hedge.toml")).unwrap();
        assert_eq!(config.backtest.default_capital, 100_000.0);
        assert_eq!(config.backtest.default_leverage, 10.0);
        assert_eq!(config.backtest.lookback_days, 30);
    }
}
