//! Backtest command implementation.

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use hedge_agents::{LlmConfig, LlmDecisionSource, ReplaySource};
use hedge_backtest::{BacktestConfig, BacktestEngine};
use hedge_config::BacktestSettings;
use hedge_core::traits::{DecisionSource, PriceProvider};
use hedge_data::{BinanceProvider, CopinProvider, CsvPriceSource, HyperliquidProvider};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::cli::{BacktestArgs, PriceSource};

/// Flags override the configured defaults; omitted flags fall back to
/// the `[backtest]` config section.
fn build_config(
    args: &BacktestArgs,
    defaults: &BacktestSettings,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> BacktestConfig {
    let mut config = BacktestConfig::new(args.crypto.clone(), start, end);
    config.initial_capital = args.initial_capital.unwrap_or(defaults.default_capital);
    config.leverage = args.leverage.unwrap_or(defaults.default_leverage);
    config.risk_fraction = args.risk.unwrap_or(defaults.default_risk);
    config.lookback_days = defaults.lookback_days;
    config
}

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let app_config = hedge_config::load_config(config_path).context("Failed to load config")?;

    let end = args.end_date.unwrap_or_else(|| Local::now().date_naive());
    let start = args
        .start_date
        .unwrap_or(end - Duration::days(app_config.backtest.lookback_days));

    info!(
        "Starting backtest for {} from {} to {}",
        args.crypto, start, end
    );

    let config = build_config(&args, &app_config.backtest, start, end);

    let prices: Arc<dyn PriceProvider> = if let Some(data_path) = &args.data {
        if !data_path.exists() {
            anyhow::bail!(
                "Data path '{}' does not exist. Provide a CSV file with timestamp and close columns",
                data_path.display()
            );
        }
        Arc::new(CsvPriceSource::new(data_path).context("Failed to load CSV data")?)
    } else {
        match args.source {
            PriceSource::Hyperliquid => Arc::new(HyperliquidProvider::new(
                app_config.providers.hyperliquid_url.clone(),
            )),
            PriceSource::Binance => Arc::new(BinanceProvider::new(
                app_config.providers.binance_url.clone(),
            )),
        }
    };

    let decisions: Box<dyn DecisionSource> = if let Some(decisions_path) = &args.decisions {
        Box::new(
            ReplaySource::from_path(decisions_path).context("Failed to load decision replay")?,
        )
    } else {
        let api_key = std::env::var(&app_config.llm.api_key_env).with_context(|| {
            format!(
                "LLM API key not found in environment variable {}",
                app_config.llm.api_key_env
            )
        })?;
        let llm_config = LlmConfig {
            base_url: app_config.llm.base_url.clone(),
            api_key,
            model: app_config.llm.model.clone(),
        };
        let open_interest = Arc::new(CopinProvider::new(app_config.providers.copin_oi_url.clone()));
        Box::new(
            LlmDecisionSource::new(llm_config, Arc::clone(&prices), open_interest)
                .with_show_reasoning(args.show_reasoning),
        )
    };

    let engine = BacktestEngine::new(config);
    let report = engine.run(prices.as_ref(), decisions.as_ref()).await?;

    match args.output.as_str() {
        "json" => {
            let json = report.to_json()?;
            println!("{}", json);
        }
        _ => {
            println!("{}", report.summary());
        }
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args() -> BacktestArgs {
        BacktestArgs {
            crypto: "BTC".to_string(),
            start_date: None,
            end_date: None,
            initial_capital: None,
            leverage: None,
            risk: None,
            decisions: None,
            data: None,
            source: PriceSource::Hyperliquid,
            show_reasoning: false,
            output: "text".to_string(),
            save: None,
        }
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_omitted_flags_use_config_defaults() {
        let defaults = BacktestSettings {
            default_capital: 250_000.0,
            default_leverage: 5.0,
            default_risk: 0.02,
            lookback_days: 14,
        };
        let (start, end) = dates();

        let config = build_config(&args(), &defaults, start, end);
        assert_eq!(config.initial_capital, 250_000.0);
        assert_eq!(config.leverage, 5.0);
        assert_eq!(config.risk_fraction, 0.02);
        assert_eq!(config.lookback_days, 14);
    }

    #[test]
    fn test_flags_override_config_defaults() {
        let mut args = args();
        args.initial_capital = Some(50_000.0);
        args.leverage = Some(20.0);
        args.risk = Some(0.1);
        let (start, end) = dates();

        let config = build_config(&args, &BacktestSettings::default(), start, end);
        assert_eq!(config.initial_capital, 50_000.0);
        assert_eq!(config.leverage, 20.0);
        assert_eq!(config.risk_fraction, 0.1);
    }
}
