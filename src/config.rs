//! Configuration types for backtest-lab

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Simulation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestConfig {
    /// Symbol to trade
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Starting cash
    #[serde(default = "default_initial_cash")]
    pub initial_cash: Decimal,

    /// Flat fee per fill
    #[serde(default)]
    pub commission: Decimal,

    /// Stop distance below entry as a fraction of price
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: Decimal,

    /// Annual risk-free rate for the Sharpe ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Tail fraction for historical VaR
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// How fills are paired for the win rate
    #[serde(default)]
    pub win_rate_method: WinRateMethod,
}

/// Win-rate trade pairing
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WinRateMethod {
    /// Sells matched FIFO against open buys of the same symbol
    #[default]
    Matched,
    /// Adjacent log entries paired two at a time
    Positional,
}

fn default_symbol() -> String {
    "AAPL".to_string()
}
fn default_initial_cash() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_stop_loss_pct() -> Decimal {
    Decimal::new(5, 2) // 0.05 = 5% below entry
}
fn default_risk_free_rate() -> f64 {
    crate::risk::DEFAULT_RISK_FREE_RATE
}
fn default_var_confidence() -> f64 {
    crate::risk::DEFAULT_VAR_CONFIDENCE
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            initial_cash: default_initial_cash(),
            commission: Decimal::ZERO,
            stop_loss_pct: default_stop_loss_pct(),
            risk_free_rate: default_risk_free_rate(),
            var_confidence: default_var_confidence(),
            win_rate_method: WinRateMethod::Matched,
        }
    }
}

/// Risk limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    /// Max fraction of portfolio value in one position
    #[serde(default = "default_max_position_size")]
    pub max_position_size: Decimal,

    /// Max fraction of portfolio value risked per trade
    #[serde(default = "default_max_portfolio_risk")]
    pub max_portfolio_risk: Decimal,
}

fn default_max_position_size() -> Decimal {
    Decimal::new(10, 2) // 0.10 = 10%
}
fn default_max_portfolio_risk() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position_size: default_max_position_size(),
            max_portfolio_risk: default_max_portfolio_risk(),
        }
    }
}

/// Strategy selection and parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub kind: StrategyKind,

    /// Moving average: short window
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Moving average: long window
    #[serde(default = "default_long_window")]
    pub long_window: usize,

    /// Momentum: bars between compared closes
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// Momentum: minimum fractional move
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,

    /// RSI: averaging period
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    /// RSI: buy below this reading
    #[serde(default = "default_oversold")]
    pub oversold: Decimal,
    /// RSI: sell above this reading
    #[serde(default = "default_overbought")]
    pub overbought: Decimal,
}

/// Strategy variant
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    MovingAverage,
    Momentum,
    Rsi,
}

fn default_short_window() -> usize {
    10
}
fn default_long_window() -> usize {
    30
}
fn default_lookback() -> usize {
    14
}
fn default_threshold() -> Decimal {
    Decimal::new(2, 2) // 0.02 = 2%
}
fn default_rsi_period() -> usize {
    14
}
fn default_oversold() -> Decimal {
    Decimal::new(30, 0)
}
fn default_overbought() -> Decimal {
    Decimal::new(70, 0)
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::MovingAverage,
            short_window: 10,
            long_window: 30,
            lookback: 14,
            threshold: Decimal::new(2, 2),
            rsi_period: 14,
            oversold: Decimal::new(30, 0),
            overbought: Decimal::new(70, 0),
        }
    }
}

/// Price data source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// CSV file to load; synthetic data when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,

    /// First date to include
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Last date to include
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,

    /// Synthetic: RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Synthetic: number of daily bars
    #[serde(default = "default_days")]
    pub days: usize,
    /// Synthetic: first close
    #[serde(default = "default_start_price")]
    pub start_price: f64,
    /// Synthetic: mean daily return
    #[serde(default = "default_drift")]
    pub drift: f64,
    /// Synthetic: daily return std dev
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Synthetic: date of the first bar
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

fn default_seed() -> u64 {
    42
}
fn default_days() -> usize {
    252
}
fn default_start_price() -> f64 {
    100.0
}
fn default_drift() -> f64 {
    0.0005
}
fn default_volatility() -> f64 {
    0.02
}
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            start: None,
            end: None,
            seed: default_seed(),
            days: default_days(),
            start_price: default_start_price(),
            drift: default_drift(),
            volatility: default_volatility(),
            start_date: default_start_date(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
