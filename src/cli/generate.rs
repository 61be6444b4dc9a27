//! Generate command implementation

use crate::config::Config;
use crate::data::{write_csv, SyntheticGenerator};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Symbol label for the series
    #[arg(long)]
    pub symbol: Option<String>,

    /// Number of daily bars
    #[arg(long)]
    pub days: Option<usize>,

    /// RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output CSV path
    #[arg(short, long)]
    pub output: PathBuf,
}

impl GenerateArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbol = self
            .symbol
            .clone()
            .unwrap_or_else(|| config.backtest.symbol.clone());

        let mut generator = SyntheticGenerator::from_config(&config.data);
        if let Some(days) = self.days {
            generator.days = days;
        }
        if let Some(seed) = self.seed {
            generator.seed = seed;
        }

        let series = generator.generate(&symbol)?;
        write_csv(&series, &self.output)?;

        tracing::info!(
            %symbol,
            bars = series.len(),
            path = %self.output.display(),
            "Wrote synthetic series"
        );
        Ok(())
    }
}
