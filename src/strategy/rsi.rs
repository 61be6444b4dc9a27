//! Relative Strength Index mean reversion

use super::{Signal, Strategy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Buys oversold and sells overbought readings
#[derive(Debug, Clone)]
pub struct Rsi {
    pub period: usize,
    pub oversold: Decimal,
    pub overbought: Decimal,
}

impl Rsi {
    pub fn new(period: usize, oversold: Decimal, overbought: Decimal) -> Self {
        Self {
            period,
            oversold,
            overbought,
        }
    }

    /// RSI from simple averages of the last `period` close-to-close changes
    ///
    /// Returns 50 without enough history and 100 when there were no losses.
    pub fn calculate_rsi(&self, history: &[Decimal]) -> Decimal {
        if self.period == 0 || history.len() < self.period + 1 {
            return dec!(50);
        }

        let window = &history[history.len() - self.period - 1..];
        let (gains, losses) = window
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .fold((Decimal::ZERO, Decimal::ZERO), |(g, l), delta| {
                if delta > Decimal::ZERO {
                    (g + delta, l)
                } else {
                    (g, l - delta)
                }
            });

        let period = Decimal::from(self.period);
        let avg_gain = gains / period;
        let avg_loss = losses / period;

        if avg_loss.is_zero() {
            return dec!(100);
        }

        let rs = avg_gain / avg_loss;
        dec!(100) - dec!(100) / (Decimal::ONE + rs)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14, dec!(30), dec!(70))
    }
}

impl Strategy for Rsi {
    fn signal(&self, history: &[Decimal]) -> Signal {
        let rsi = self.calculate_rsi(history);
        if rsi < self.oversold {
            Signal::Buy
        } else if rsi > self.overbought {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &'static str {
        "rsi"
    }
}
