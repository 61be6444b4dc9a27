//! Risk management module
//!
//! Position sizing, exposure limits, and return-series risk statistics

mod manager;
pub mod metrics;

pub use manager::RiskManager;
pub use metrics::{
    max_drawdown, sharpe_ratio, value_at_risk, DEFAULT_RISK_FREE_RATE, DEFAULT_VAR_CONFIDENCE,
    TRADING_DAYS_PER_YEAR,
};
