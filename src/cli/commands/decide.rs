//! One-shot decision command.
//!
//! Runs the LLM pipeline once against live data and prints the parsed
//! decision, without simulating any trades.

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use hedge_agents::{LlmConfig, LlmDecisionSource};
use hedge_core::traits::{DecisionSource, PriceProvider};
use hedge_core::types::LedgerSnapshot;
use hedge_data::{BinanceProvider, CopinProvider, HyperliquidProvider};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::cli::{DecideArgs, PriceSource};

pub async fn run(args: DecideArgs, config_path: &Path) -> Result<()> {
    let app_config = hedge_config::load_config(config_path).context("Failed to load config")?;

    let end = args.end_date.unwrap_or_else(|| Local::now().date_naive());
    let start = args
        .start_date
        .unwrap_or(end - Duration::days(app_config.backtest.lookback_days));

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

    let prices: Arc<dyn PriceProvider> = match args.source {
        PriceSource::Hyperliquid => Arc::new(HyperliquidProvider::new(
            app_config.providers.hyperliquid_url.clone(),
        )),
        PriceSource::Binance => Arc::new(BinanceProvider::new(
            app_config.providers.binance_url.clone(),
        )),
    };
    let open_interest = Arc::new(CopinProvider::new(app_config.providers.copin_oi_url.clone()));
    let source = LlmDecisionSource::new(llm_config, prices, open_interest)
        .with_show_reasoning(args.show_reasoning);

    // A flat ledger: all capital in cash, no open position. Omitted
    // flags fall back to the [backtest] config section.
    let balance = args.balance.unwrap_or(app_config.backtest.default_capital);
    let ledger = LedgerSnapshot {
        cash: balance,
        collateral_long: 0.0,
        collateral_short: 0.0,
        entry_price: 0.0,
        leverage: args
            .leverage
            .unwrap_or(app_config.backtest.default_leverage),
        risk_fraction: args.risk.unwrap_or(app_config.backtest.default_risk),
        portfolio_value: balance,
    };

    info!(
        "Requesting decision for {} over {} to {}",
        args.crypto, start, end
    );
    let decision = source
        .decide(&args.crypto, start, end, &ledger)
        .await
        .context("Decision source failed")?;

    println!("{}", serde_json::to_string_pretty(&decision)?);

    Ok(())
}
