//! Configuration structures.

use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "hedge".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Upstream data provider endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub hyperliquid_url: String,
    pub binance_url: String,
    pub copin_oi_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hyperliquid_url: "https://api.hyperliquid.xyz/info".to_string(),
            binance_url: "https://fapi.binance.com".to_string(),
            copin_oi_url: "https://api.copin.io/positions/filter".to_string(),
        }
    }
}

/// LLM decision-source settings. The API key is referenced by
/// environment variable name, never stored in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

/// Backtest defaults used when flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSettings {
    pub default_capital: f64,
    pub default_leverage: f64,
    pub default_risk: f64,
    pub lookback_days: i64,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            default_capital: 100_000.0,
            default_leverage: 10.0,
            default_risk: 0.05,
            lookback_days: 30,
        }
    }
}
