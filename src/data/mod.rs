//! Market data supply
//!
//! Daily OHLCV series from CSV files or a seeded synthetic generator, plus
//! technical indicators over their closes

mod csv_io;
mod indicators;
mod loader;
mod synthetic;
mod types;

pub use csv_io::{load_csv, write_csv};
pub use indicators::{
    bollinger_bands, ema, rolling_std, rsi, sma, BollingerBands, TechnicalIndicators,
};
pub use loader::DataLoader;
pub use synthetic::SyntheticGenerator;
pub use types::{Bar, DataError, PriceSeries};
