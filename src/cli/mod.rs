//! CLI interface for backtest-lab
//!
//! Provides subcommands for:
//! - `backtest`: Run a strategy over CSV or synthetic data
//! - `generate`: Write a synthetic price series to CSV
//! - `config`: Show effective configuration

mod backtest;
mod generate;

pub use backtest::{load_series, BacktestArgs, OutputFormat, StrategyArg};
pub use generate::GenerateArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "backtest-lab")]
#[command(about = "Daily-bar strategy backtester with risk-based position sizing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a backtest and print the results
    Backtest(BacktestArgs),
    /// Write synthetic daily bars to CSV
    Generate(GenerateArgs),
    /// Show effective configuration
    Config,
}
