//! Decision sources for the backtest engine.
//!
//! Three implementations of the `DecisionSource` trait: a scripted
//! in-memory sequence, a replay of a recorded decision file, and an
//! LLM-backed source combining risk limits with open-interest sentiment.

mod llm;
mod scripted;
mod sentiment;

pub use llm::{LlmConfig, LlmDecisionSource};
pub use scripted::{ReplaySource, ScriptedSource};
pub use sentiment::{assess_sentiment, MarketSignal, SentimentSignal};
