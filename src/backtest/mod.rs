//! Backtesting module
//!
//! Replays a daily close series through a strategy, sizing entries with the
//! risk manager and booking fills on a cash portfolio.

mod analytics;
mod simulator;

pub use analytics::{period_returns, win_rate, BacktestResult};
pub use simulator::{Backtester, PositionState};

use thiserror::Error;

/// Backtest errors
#[derive(Debug, Error)]
pub enum BacktestError {
    /// Settings that make the run meaningless
    #[error("Invalid backtest configuration: {0}")]
    InvalidConfig(String),
}
