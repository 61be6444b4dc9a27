//! Rate-of-change momentum

use super::{Signal, Strategy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Trades when the move over `lookback` bars exceeds `threshold`
#[derive(Debug, Clone)]
pub struct Momentum {
    pub lookback: usize,
    /// Fractional move, e.g. 0.02 = 2%
    pub threshold: Decimal,
}

impl Momentum {
    pub fn new(lookback: usize, threshold: Decimal) -> Self {
        Self {
            lookback,
            threshold,
        }
    }

    /// Fractional change from `lookback` bars ago to the last close
    pub fn momentum(&self, history: &[Decimal]) -> Option<Decimal> {
        if history.len() < self.lookback + 1 {
            return None;
        }
        let last = *history.last()?;
        let base = history[history.len() - 1 - self.lookback];
        if base.is_zero() {
            return None;
        }
        Some((last - base) / base)
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(14, dec!(0.02))
    }
}

impl Strategy for Momentum {
    fn signal(&self, history: &[Decimal]) -> Signal {
        match self.momentum(history) {
            Some(m) if m > self.threshold => Signal::Buy,
            Some(m) if m < -self.threshold => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    fn name(&self) -> &'static str {
        "momentum"
    }
}
