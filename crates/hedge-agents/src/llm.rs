//! LLM-backed decision source.

use async_trait::async_trait;
use chrono::NaiveDate;
use hedge_core::error::DecisionError;
use hedge_core::traits::{DecisionSource, OpenInterestProvider, PriceProvider};
use hedge_core::types::{Decision, LedgerSnapshot};
use hedge_risk::{RiskAssessment, RiskEngine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::sentiment::{assess_sentiment, SentimentSignal};

const SYSTEM_PROMPT: &str = "You are a portfolio manager making a leveraged trading decision \
for a single asset. You must respect the risk constraints: the quantity must never exceed \
max_position_margin, and stop-loss/take-profit bands are hard limits. Weigh the sentiment \
signal for direction, then size within the risk limits. Respond with a single JSON object \
and nothing else: {\"action\": \"long\" | \"short\" | \"hold\", \"quantity\": <non-negative number>}";

/// Connection settings for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    content: String,
}

/// Prompts a chat model with the ledger snapshot, risk limits, and
/// open-interest sentiment, and parses its JSON decision.
///
/// Transport failures surface as `DecisionError::Unavailable`, never as
/// a fabricated hold; an unparseable reply is `Malformed` and left to
/// the caller to downgrade.
pub struct LlmDecisionSource {
    client: Client,
    config: LlmConfig,
    risk_engine: RiskEngine,
    prices: Arc<dyn PriceProvider>,
    open_interest: Arc<dyn OpenInterestProvider>,
    show_reasoning: bool,
}

impl LlmDecisionSource {
    /// Create a source backed by the given providers.
    pub fn new(
        config: LlmConfig,
        prices: Arc<dyn PriceProvider>,
        open_interest: Arc<dyn OpenInterestProvider>,
    ) -> Self {
        Self {
            client: Client::new(),
            config,
            risk_engine: RiskEngine::default(),
            prices,
            open_interest,
            show_reasoning: false,
        }
    }

    /// Dump intermediate signals and the model reply to the log.
    pub fn with_show_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    fn build_prompt(
        &self,
        symbol: &str,
        ledger: &LedgerSnapshot,
        risk: &RiskAssessment,
        sentiment: &SentimentSignal,
    ) -> String {
        json!({
            "symbol": symbol,
            "portfolio": ledger,
            "risk": {
                "max_position_margin": risk.max_position_margin,
                "volatility": risk.volatility,
                "stop_loss_pct": risk.stop_loss_pct,
                "take_profit_pct": risk.take_profit_pct,
            },
            "sentiment": sentiment,
        })
        .to_string()
    }

    async fn complete(&self, prompt: &str) -> Result<String, DecisionError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DecisionError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DecisionError::Unavailable(e.to_string()))?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| DecisionError::Unavailable(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DecisionError::Unavailable("empty completion".into()))
    }
}

/// Extract the first JSON object from a model reply, tolerating code
/// fences and surrounding prose.
fn extract_json(reply: &str) -> Result<&str, DecisionError> {
    let start = reply
        .find('{')
        .ok_or_else(|| DecisionError::Malformed(format!("no JSON object in reply: {reply}")))?;
    let end = reply
        .rfind('}')
        .ok_or_else(|| DecisionError::Malformed(format!("unterminated JSON in reply: {reply}")))?;
    if end < start {
        return Err(DecisionError::Malformed(format!(
            "unterminated JSON in reply: {reply}"
        )));
    }
    Ok(&reply[start..=end])
}

#[async_trait]
impl DecisionSource for LlmDecisionSource {
    async fn decide(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        ledger: &LedgerSnapshot,
    ) -> Result<Decision, DecisionError> {
        // Data validity check doubles as input gathering: without prices
        // or open interest there is nothing to decide on.
        let series = self
            .prices
            .fetch(symbol, start, end)
            .await
            .map_err(|e| DecisionError::Unavailable(format!("price data: {e}")))?;
        let oi = self
            .open_interest
            .fetch_open_interest(symbol)
            .await
            .map_err(|e| DecisionError::Unavailable(format!("open interest: {e}")))?;

        let sentiment = assess_sentiment(&oi);
        let risk = self
            .risk_engine
            .assess(&series, ledger.cash, ledger.risk_fraction, ledger.leverage)
            .map_err(|e| DecisionError::Unavailable(format!("risk assessment: {e}")))?;

        let prompt = self.build_prompt(symbol, ledger, &risk, &sentiment);
        if self.show_reasoning {
            info!(target: "hedge::reasoning", { sentiment.signal = tracing::field::display(&sentiment.signal), sentiment.confidence = sentiment.confidence, risk.volatility = risk.volatility, risk.max_position_margin = risk.max_position_margin }, "agent inputs");
        }

        let reply = self.complete(&prompt).await?;
        if self.show_reasoning {
            info!(target: "hedge::reasoning", reply = %reply, "model reply");
        }

        Decision::from_json(extract_json(&reply)?)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
