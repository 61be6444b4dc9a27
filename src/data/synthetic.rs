//! Synthetic daily bars from a seeded random walk

use super::{Bar, DataError, PriceSeries};
use crate::config::DataConfig;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;

/// Decimal places kept on generated prices
const PRICE_DP: u32 = 4;

/// Generates reproducible OHLCV series
///
/// Each call to [`generate`](Self::generate) seeds its own `StdRng`, so the
/// same generator always yields the same series and concurrent callers never
/// share random state.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    pub seed: u64,
    pub days: usize,
    pub start_price: f64,
    /// Mean daily return
    pub drift: f64,
    /// Std dev of daily returns
    pub volatility: f64,
    pub start_date: NaiveDate,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Create from DataConfig
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            seed: config.seed,
            days: config.days,
            start_price: config.start_price,
            drift: config.drift,
            volatility: config.volatility,
            start_date: config.start_date,
        }
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_start_price(mut self, start_price: f64) -> Self {
        self.start_price = start_price;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Generate `days` calendar-daily bars for `symbol`
    ///
    /// Closes follow `p[t] = p[t-1] * (1 + r[t])` with `r ~ N(drift, volatility)`,
    /// open equals close, high/low add `|N(0, 0.01)|` jitter, and volume is
    /// uniform in `[100_000, 1_000_000)`.
    pub fn generate(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        if !(self.volatility >= 0.0 && self.volatility.is_finite()) {
            return Err(DataError::InvalidVolatility(self.volatility));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let returns = Normal::new(self.drift, self.volatility)
            .map_err(|_| DataError::InvalidVolatility(self.volatility))?;
        let jitter =
            Normal::new(0.0_f64, 0.01).map_err(|_| DataError::InvalidVolatility(0.01))?;

        let mut closes = Vec::with_capacity(self.days);
        let mut price = self.start_price;
        for i in 0..self.days {
            let r: f64 = returns.sample(&mut rng);
            // The first draw is discarded so the series starts at start_price
            if i > 0 {
                price *= 1.0 + r;
            }
            closes.push(price);
        }

        let mut bars = Vec::with_capacity(self.days);
        for (date, close) in self.start_date.iter_days().zip(closes) {
            let high_raw = close * (1.0 + jitter.sample(&mut rng).abs());
            let low_raw = close * (1.0 - jitter.sample(&mut rng).abs());
            let volume = rng.gen_range(100_000..1_000_000);

            let close = to_price(close)?;
            bars.push(Bar {
                date,
                open: close,
                high: to_price(high_raw)?.max(close),
                low: to_price(low_raw)?.min(close),
                close,
                volume,
            });
        }

        tracing::debug!(symbol, bars = bars.len(), seed = self.seed, "Generated synthetic series");
        PriceSeries::new(symbol, bars)
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self {
            seed: 42,
            days: 252,
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

fn to_price(value: f64) -> Result<Decimal, DataError> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(PRICE_DP))
        .map_err(|_| DataError::InvalidPrice(value))
}
