pub mod backtest;
pub mod decide;
pub mod validate;
