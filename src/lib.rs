//! backtest-lab: daily-bar strategy backtesting with risk-based sizing
//!
//! This library provides the core components for:
//! - Cash portfolio ledger with whole-share fills and a trade log
//! - Position sizing, exposure limits, Sharpe ratio, drawdown and VaR
//! - Moving-average, momentum and RSI signal generators
//! - CSV and seeded synthetic price data
//! - A bar-by-bar backtest loop with result reporting

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod portfolio;
pub mod risk;
pub mod strategy;
pub mod telemetry;
