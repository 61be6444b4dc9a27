//! Trading strategies
//!
//! Every strategy maps the close history seen so far to a [`Signal`]. The
//! backtester only ever passes a prefix ending at the current bar, so a
//! strategy cannot see future prices.

mod momentum;
mod moving_average;
mod rsi;
mod types;

pub use momentum::Momentum;
pub use moving_average::MovingAverageCrossover;
pub use rsi::Rsi;
pub use types::Signal;

use crate::config::{StrategyConfig, StrategyKind};
use rust_decimal::Decimal;

/// Trait for signal generators
pub trait Strategy: Send + Sync {
    /// Signal for the last element of `history` (closes, oldest first)
    fn signal(&self, history: &[Decimal]) -> Signal;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Create a strategy based on configuration
pub fn create_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config.kind {
        StrategyKind::MovingAverage => Box::new(MovingAverageCrossover::new(
            config.short_window,
            config.long_window,
        )),
        StrategyKind::Momentum => Box::new(Momentum::new(config.lookback, config.threshold)),
        StrategyKind::Rsi => Box::new(Rsi::new(
            config.rsi_period,
            config.oversold,
            config.overbought,
        )),
    }
}

/// Arithmetic mean, 0 for an empty slice
pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[dec!(1), dec!(2), dec!(3), dec!(4)]), dec!(2.5));
        assert_eq!(mean(&[]), dec!(0));
    }

    #[test]
    fn test_create_strategy_by_kind() {
        let mut config = StrategyConfig::default();
        assert_eq!(create_strategy(&config).name(), "moving_average");

        config.kind = StrategyKind::Momentum;
        assert_eq!(create_strategy(&config).name(), "momentum");

        config.kind = StrategyKind::Rsi;
        assert_eq!(create_strategy(&config).name(), "rsi");
    }

    #[test]
    fn test_created_strategy_uses_config_windows() {
        let config = StrategyConfig {
            short_window: 2,
            long_window: 3,
            ..StrategyConfig::default()
        };
        let strategy = create_strategy(&config);

        assert_eq!(strategy.signal(&[dec!(1), dec!(2)]), Signal::Hold);
        assert_eq!(strategy.signal(&[dec!(1), dec!(2), dec!(3)]), Signal::Buy);
    }
}
