//! Validate configuration command.

use anyhow::Result;
use hedge_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("HyperLiquid URL: {}", config.providers.hyperliquid_url);
            println!("Copin OI URL: {}", config.providers.copin_oi_url);
            println!("LLM model: {}", config.llm.model);
            println!("LLM API key env: {}", config.llm.api_key_env);
            println!("Default capital: {}", config.backtest.default_capital);
            println!("Default leverage: {}x", config.backtest.default_leverage);
            println!("Default risk: {}", config.backtest.default_risk);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
