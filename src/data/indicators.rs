//! Technical indicators over close prices
//!
//! Rolling indicators yield `None` until their window is full. EMAs use the
//! bias-adjusted weighting `sum(w_i * x_{t-i}) / sum(w_i)` with
//! `w_i = (1 - alpha)^i` and `alpha = 2 / (span + 1)`, so they are defined
//! from the first bar.

use super::PriceSeries;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Indicator columns aligned with the bars of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalIndicators {
    pub sma_10: Vec<Option<Decimal>>,
    pub sma_20: Vec<Option<Decimal>>,
    pub sma_50: Vec<Option<Decimal>>,
    pub ema_12: Vec<Decimal>,
    pub ema_26: Vec<Decimal>,
    pub macd: Vec<Decimal>,
    pub macd_signal: Vec<Decimal>,
    pub macd_histogram: Vec<Decimal>,
    pub bb_upper: Vec<Option<Decimal>>,
    pub bb_middle: Vec<Option<Decimal>>,
    pub bb_lower: Vec<Option<Decimal>>,
    pub rsi: Vec<Option<Decimal>>,
}

impl TechnicalIndicators {
    /// Standard indicator set: SMA 10/20/50, EMA 12/26, MACD(12, 26, 9),
    /// 20-bar Bollinger bands at 2 std devs and 14-bar RSI
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();

        let ema_12 = ema(&closes, 12);
        let ema_26 = ema(&closes, 26);
        let macd: Vec<Decimal> = ema_12.iter().zip(&ema_26).map(|(f, s)| f - s).collect();
        let macd_signal = ema(&macd, 9);
        let macd_histogram = macd.iter().zip(&macd_signal).map(|(m, s)| m - s).collect();

        let bands = bollinger_bands(&closes, 20, dec!(2));

        Self {
            sma_10: sma(&closes, 10),
            sma_20: sma(&closes, 20),
            sma_50: sma(&closes, 50),
            ema_12,
            ema_26,
            macd,
            macd_signal,
            macd_histogram,
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            rsi: rsi(&closes, 14),
        }
    }

    /// Number of bars covered
    pub fn len(&self) -> usize {
        self.ema_12.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema_12.is_empty()
    }
}

/// Bollinger band columns
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<Decimal>>,
    pub middle: Vec<Option<Decimal>>,
    pub lower: Vec<Option<Decimal>>,
}

/// Simple moving average over a trailing window
pub fn sma(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    rolling(values, window, |w| w.iter().sum::<Decimal>() / Decimal::from(w.len()))
}

/// Sample standard deviation (n - 1) over a trailing window
///
/// Needs at least 2 values per window; a window of 1 yields `None` throughout.
pub fn rolling_std(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, sample_std).into_iter().map(Option::flatten).collect()
}

/// Bias-adjusted exponential moving average with `alpha = 2 / (span + 1)`
///
/// A span of 0 is treated as 1, which returns the input unchanged.
pub fn ema(values: &[Decimal], span: usize) -> Vec<Decimal> {
    let decay = Decimal::ONE - dec!(2) / Decimal::from(span.max(1) + 1);
    let mut weighted_sum = Decimal::ZERO;
    let mut weight_total = Decimal::ZERO;

    values
        .iter()
        .map(|&value| {
            weighted_sum = value + decay * weighted_sum;
            weight_total = Decimal::ONE + decay * weight_total;
            weighted_sum / weight_total
        })
        .collect()
}

/// Middle band is the SMA, outer bands sit `num_std` sample std devs away
pub fn bollinger_bands(values: &[Decimal], window: usize, num_std: Decimal) -> BollingerBands {
    let middle = sma(values, window);
    let std = rolling_std(values, window);

    let band = |sign: Decimal| -> Vec<Option<Decimal>> {
        middle
            .iter()
            .zip(&std)
            .map(|(m, s)| Some((*m)? + sign * num_std * (*s)?))
            .collect()
    };

    BollingerBands {
        upper: band(Decimal::ONE),
        lower: band(Decimal::NEGATIVE_ONE),
        middle,
    }
}

/// RSI from rolling means of gains and losses
///
/// The first bar counts as a zero change, so the first reading lands on
/// index `period - 1`. A window with neither gains nor losses yields `None`;
/// one with only gains yields 100.
pub fn rsi(values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
    let changes: Vec<Decimal> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { Decimal::ZERO } else { v - values[i - 1] })
        .collect();
    let gains: Vec<Decimal> = changes.iter().map(|&c| c.max(Decimal::ZERO)).collect();
    let losses: Vec<Decimal> = changes.iter().map(|&c| (-c).max(Decimal::ZERO)).collect();

    sma(&gains, period)
        .into_iter()
        .zip(sma(&losses, period))
        .map(|(gain, loss)| {
            let (gain, loss) = (gain?, loss?);
            if loss.is_zero() {
                return (!gain.is_zero()).then_some(dec!(100));
            }
            Some(dec!(100) - dec!(100) / (Decimal::ONE + gain / loss))
        })
        .collect()
}

fn rolling<T>(
    values: &[Decimal],
    window: usize,
    f: impl Fn(&[Decimal]) -> T,
) -> Vec<Option<T>> {
    if window == 0 {
        return values.iter().map(|_| None).collect();
    }
    (0..values.len())
        .map(|i| (i + 1 >= window).then(|| f(&values[i + 1 - window..=i])))
        .collect()
}

fn sample_std(window: &[Decimal]) -> Option<Decimal> {
    let n = Decimal::from(window.len());
    let mean = window.iter().sum::<Decimal>() / n;
    let variance = window
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);
    Decimal::try_from(variance.to_f64()?.sqrt()).ok()
}
