//! CSV import and export of daily bars
//!
//! Expected header: `date,open,high,low,close,volume`. Extra columns are
//! ignored; dates are `YYYY-MM-DD`.

use super::{Bar, DataError, PriceSeries};
use std::fs::File;
use std::path::Path;

/// Load and validate a series from a CSV file
pub fn load_csv(path: impl AsRef<Path>, symbol: &str) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let bars = reader
        .deserialize::<Bar>()
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(?path, symbol, bars = bars.len(), "Loaded CSV series");
    PriceSeries::new(symbol, bars)
}

/// Write a series to CSV, creating parent directories as needed
pub fn write_csv(series: &PriceSeries, path: impl AsRef<Path>) -> Result<(), DataError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DataError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    for bar in series.bars() {
        writer.serialize(bar)?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
