//! Market data types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Data supply errors
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying file error
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed CSV or missing column
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Bar violates high >= open/close >= low > 0
    #[error("Inconsistent bar for {symbol} on {date}")]
    InvalidBar { symbol: String, date: NaiveDate },
    /// Dates not strictly increasing
    #[error("Bars for {symbol} out of order at {date}")]
    OutOfOrder { symbol: String, date: NaiveDate },
    /// Generated price not representable
    #[error("Synthetic price not representable: {0}")]
    InvalidPrice(f64),
    /// Return volatility negative or not finite
    #[error("Volatility must be finite and non-negative, got {0}")]
    InvalidVolatility(f64),
}

/// One daily OHLCV observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    pub volume: u64,
}

impl Bar {
    /// True when high bounds open/close from above, low from below, and low > 0
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.low > Decimal::ZERO
    }
}

/// Chronologically ordered bars for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting inconsistent or out-of-order bars
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        let symbol = symbol.into();

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_consistent() {
                return Err(DataError::InvalidBar {
                    symbol,
                    date: bar.date,
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(DataError::OutOfOrder {
                    symbol,
                    date: bar.date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    /// Series where every bar has open = high = low = close
    ///
    /// Dates are consecutive days from `start`.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[Decimal],
    ) -> Result<Self, DataError> {
        let bars = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| Bar {
                date,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar at position `index`
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Bar dated `date`
    pub fn get_by_date(&self, date: NaiveDate) -> Option<&Bar> {
        self.bars
            .binary_search_by_key(&date, |bar| bar.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// Close prices, oldest first
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Sub-series with `start <= date <= end`, either bound optional
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PriceSeries {
        let bars = self
            .bars
            .iter()
            .filter(|bar| start.map_or(true, |s| bar.date >= s))
            .filter(|bar| end.map_or(true, |e| bar.date <= e))
            .cloned()
            .collect();
        PriceSeries {
            symbol: self.symbol.clone(),
            bars,
        }
    }

    /// Last close
    pub fn latest_price(&self) -> Option<Decimal> {
        self.bars.last().map(|bar| bar.close)
    }

    /// Last `days` closes, oldest first
    pub fn price_history(&self, days: usize) -> Vec<Decimal> {
        let start = self.bars.len().saturating_sub(days);
        self.bars[start..].iter().map(|bar| bar.close).collect()
    }
}
