//! Core types and traits for the backtesting system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries)
//! - The leveraged portfolio ledger and trade decisions
//! - Error taxonomy shared across the workspace
//! - Traits for price providers, open-interest providers, and decision sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{EngineError, EngineResult};
pub use types::*;
pub use traits::*;
