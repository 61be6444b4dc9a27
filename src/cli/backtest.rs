//! Backtest command implementation

use crate::backtest::Backtester;
use crate::config::{Config, StrategyKind};
use crate::data::{load_csv, PriceSeries, SyntheticGenerator};
use crate::strategy::create_strategy;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Strategy selection on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    MovingAverage,
    Momentum,
    Rsi,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::MovingAverage => StrategyKind::MovingAverage,
            StrategyArg::Momentum => StrategyKind::Momentum,
            StrategyArg::Rsi => StrategyKind::Rsi,
        }
    }
}

/// Result output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Symbol to trade
    #[arg(long)]
    pub symbol: Option<String>,

    /// Strategy to run
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// CSV file with daily bars; synthetic data when omitted
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Synthetic bar count
    #[arg(long)]
    pub days: Option<usize>,

    /// Synthetic RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BacktestArgs {
    /// Config with command-line overrides applied
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(symbol) = &self.symbol {
            config.backtest.symbol = symbol.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy.kind = strategy.into();
        }
        if let Some(capital) = self.capital {
            config.backtest.initial_cash = capital;
        }
        if let Some(csv) = &self.csv {
            config.data.csv_path = Some(csv.clone());
        }
        if self.start.is_some() {
            config.data.start = self.start;
        }
        if self.end.is_some() {
            config.data.end = self.end;
        }
        if let Some(days) = self.days {
            config.data.days = days;
        }
        if let Some(seed) = self.seed {
            config.data.seed = seed;
        }
        config
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let config = self.apply(config);
        let series = load_series(&config)?;
        let strategy = create_strategy(&config.strategy);

        let result = Backtester::from_config(&config).run(&series, strategy.as_ref())?;

        match self.format {
            OutputFormat::Table => println!("{}", result.format_table()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }
        Ok(())
    }
}

/// Price series for the configured symbol and date range
///
/// Reads `data.csv_path` when set, otherwise generates synthetic bars.
pub fn load_series(config: &Config) -> anyhow::Result<PriceSeries> {
    let symbol = &config.backtest.symbol;
    let series = match &config.data.csv_path {
        Some(path) => load_csv(path, symbol)
            .with_context(|| format!("Failed to load {symbol} from {}", path.display()))?,
        None => SyntheticGenerator::from_config(&config.data).generate(symbol)?,
    };

    let series = series.between(config.data.start, config.data.end);
    if series.is_empty() {
        tracing::warn!(%symbol, "No bars in the selected range");
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::write_csv;
    use rust_decimal_macros::dec;

    fn args() -> BacktestArgs {
        BacktestArgs {
            symbol: None,
            strategy: None,
            csv: None,
            start: None,
            end: None,
            days: None,
            seed: None,
            capital: None,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_apply_without_overrides_keeps_config() {
        let config = Config::default();
        let applied = args().apply(&config);
        assert_eq!(applied.backtest.symbol, "AAPL");
        assert_eq!(applied.data.days, 252);
        assert_eq!(applied.strategy.kind, StrategyKind::MovingAverage);
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = BacktestArgs {
            symbol: Some("MSFT".to_string()),
            strategy: Some(StrategyArg::Momentum),
            days: Some(30),
            seed: Some(7),
            capital: Some(dec!(5000)),
            ..args()
        };
        let applied = overrides.apply(&Config::default());

        assert_eq!(applied.backtest.symbol, "MSFT");
        assert_eq!(applied.strategy.kind, StrategyKind::Momentum);
        assert_eq!(applied.data.days, 30);
        assert_eq!(applied.data.seed, 7);
        assert_eq!(applied.backtest.initial_cash, dec!(5000));
    }

    #[test]
    fn test_load_series_synthetic_with_range() {
        let mut config = Config::default();
        config.data.days = 10;
        config.data.start = NaiveDate::from_ymd_opt(2024, 1, 3);
        config.data.end = NaiveDate::from_ymd_opt(2024, 1, 5);

        let series = load_series(&config).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "AAPL");
    }

    #[test]
    fn test_load_series_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aapl.csv");
        let source = SyntheticGenerator::new(3).with_days(5).generate("AAPL").unwrap();
        write_csv(&source, &path).unwrap();

        let mut config = Config::default();
        config.data.csv_path = Some(path);
        let series = load_series(&config).unwrap();
        assert_eq!(series, source);
    }

    #[test]
    fn test_load_series_missing_csv_errors() {
        let mut config = Config::default();
        config.data.csv_path = Some(PathBuf::from("/nonexistent/prices.csv"));
        assert!(load_series(&config).is_err());
    }
}
