//! Moving-average crossover

use super::{mean, Signal, Strategy};
use rust_decimal::Decimal;

/// Long while the short SMA is above the long SMA, exit when below
#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl MovingAverageCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Default for MovingAverageCrossover {
    fn default() -> Self {
        Self::new(10, 30)
    }
}

impl Strategy for MovingAverageCrossover {
    fn signal(&self, history: &[Decimal]) -> Signal {
        let needed = self.short_window.max(self.long_window);
        if self.short_window == 0 || self.long_window == 0 || history.len() < needed {
            return Signal::Hold;
        }

        let short_ma = mean(&history[history.len() - self.short_window..]);
        let long_ma = mean(&history[history.len() - self.long_window..]);

        if short_ma > long_ma {
            Signal::Buy
        } else if short_ma < long_ma {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    fn name(&self) -> &'static str {
        "moving_average"
    }
}
