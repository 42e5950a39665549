//! Traits for the engine's external collaborators.

mod data_source;
mod decision_source;

pub use data_source::{OpenInterest, OpenInterestProvider, PriceProvider};
pub use decision_source::DecisionSource;
