//! Return-series risk statistics
//!
//! Pure functions over return or value series. Degenerate inputs resolve to
//! zero so a simulation never stops on a statistic.

use rust_decimal::Decimal;

/// Trading days used to de-annualize the risk-free rate
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate used when none is configured
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Tail fraction used for historical VaR when none is configured
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.05;

/// Historical-simulation Value-at-Risk
///
/// Sorts `returns` ascending and returns the element at index
/// `floor(n * confidence_level)`, clamped to the last element. With
/// `confidence_level = 0.05` and 100 returns this is the 6th-worst return
/// (index 5), not the 5th. Empty input yields 0.
pub fn value_at_risk(returns: &[f64], confidence_level: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    // `as usize` saturates negative values to 0
    let index = (sorted.len() as f64 * confidence_level).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Per-period Sharpe ratio
///
/// Numerator is the mean of `returns` minus `risk_free_rate / 252`. The
/// denominator is the population standard deviation of the raw returns, not
/// of the excess returns. Fewer than 2 returns or zero deviation yields 0.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let mean_excess = returns.iter().map(|r| r - daily_rf).sum::<f64>() / n;

    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev > 0.0 {
        mean_excess / std_dev
    } else {
        0.0
    }
}

/// Largest fractional decline from a running peak
///
/// The first value seeds the peak. Fewer than 2 values yields 0, and
/// non-positive peaks are skipped.
pub fn max_drawdown(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }

    let mut peak = values[0];
    let mut max_dd = Decimal::ZERO;

    for &value in &values[1..] {
        if value > peak {
            peak = value;
        } else if peak > Decimal::ZERO {
            let drawdown = (peak - value) / peak;
            max_dd = max_dd.max(drawdown);
        }
    }

    max_dd
}
