//! Per-symbol market data cache

use super::{load_csv, DataError, PriceSeries, SyntheticGenerator, TechnicalIndicators};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;

/// Serves price series by symbol, generating synthetic data on a miss
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    generator: SyntheticGenerator,
    cache: HashMap<String, PriceSeries>,
}

impl DataLoader {
    pub fn new(generator: SyntheticGenerator) -> Self {
        Self {
            generator,
            cache: HashMap::new(),
        }
    }

    /// Load a CSV file into the cache under `symbol`
    pub fn load_csv(
        &mut self,
        path: impl AsRef<Path>,
        symbol: &str,
    ) -> Result<&PriceSeries, DataError> {
        let series = load_csv(path, symbol)?;
        self.cache.insert(symbol.to_string(), series);
        Ok(&self.cache[symbol])
    }

    /// Put an existing series in the cache
    pub fn insert(&mut self, series: PriceSeries) {
        self.cache.insert(series.symbol().to_string(), series);
    }

    fn ensure(&mut self, symbol: &str) -> Result<&PriceSeries, DataError> {
        if !self.cache.contains_key(symbol) {
            let series = self.generator.generate(symbol)?;
            self.cache.insert(symbol.to_string(), series);
        }
        Ok(&self.cache[symbol])
    }

    /// Bars for `symbol` within the inclusive date range
    pub fn get_price_data(
        &mut self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, DataError> {
        Ok(self.ensure(symbol)?.between(start, end))
    }

    pub fn latest_price(&mut self, symbol: &str) -> Result<Option<Decimal>, DataError> {
        Ok(self.ensure(symbol)?.latest_price())
    }

    /// Last `days` closes for `symbol`
    pub fn price_history(&mut self, symbol: &str, days: usize) -> Result<Vec<Decimal>, DataError> {
        Ok(self.ensure(symbol)?.price_history(days))
    }

    /// Standard indicator set over the closes of `symbol`
    pub fn add_technical_indicators(
        &mut self,
        symbol: &str,
    ) -> Result<TechnicalIndicators, DataError> {
        Ok(TechnicalIndicators::compute(self.ensure(symbol)?))
    }

    /// Series for each symbol, generating `days` bars for any not cached
    pub fn get_multiple_symbols(
        &mut self,
        symbols: &[&str],
        days: usize,
    ) -> Result<HashMap<String, PriceSeries>, DataError> {
        let generator = self.generator.clone().with_days(days);
        let mut out = HashMap::new();
        for &symbol in symbols {
            if !self.cache.contains_key(symbol) {
                self.cache
                    .insert(symbol.to_string(), generator.generate(symbol)?);
            }
            out.insert(symbol.to_string(), self.cache[symbol].clone());
        }
        Ok(out)
    }
}
