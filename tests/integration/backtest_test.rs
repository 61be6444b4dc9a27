//! Integration tests for the backtest loop

use backtest_lab::backtest::{Backtester, BacktestError};
use backtest_lab::config::{BacktestConfig, RiskConfig, WinRateMethod};
use backtest_lab::data::PriceSeries;
use backtest_lab::portfolio::TradeAction;
use backtest_lab::strategy::{Momentum, MovingAverageCrossover, Signal, Strategy};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series(closes: &[Decimal]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PriceSeries::from_closes("AAPL", start, closes).unwrap()
}

fn backtester() -> Backtester {
    Backtester::new(BacktestConfig::default(), RiskConfig::default())
}

/// Buys on the first bar it sees a price above `level`, sells below it
struct Threshold(Decimal);

impl Strategy for Threshold {
    fn signal(&self, history: &[Decimal]) -> Signal {
        match history.last() {
            Some(p) if *p > self.0 => Signal::Buy,
            Some(p) if *p < self.0 => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

#[test]
fn test_strictly_rising_series_buys_once() {
    let closes: Vec<Decimal> = (0..60).map(|i| dec!(100) + Decimal::from(i)).collect();
    let result = backtester()
        .run(&series(&closes), &MovingAverageCrossover::new(5, 20))
        .unwrap();

    assert_eq!(result.total_trades, 1);
    assert_eq!(result.trades[0].action, TradeAction::Buy);
    // Long window fills on bar 19 where the short MA is already above
    assert_eq!(result.trades[0].price, closes[19]);
    assert!(result.final_value > result.initial_cash);
    assert_eq!(result.max_drawdown, dec!(0));
}

#[test]
fn test_signal_uses_current_bar_not_next() {
    // Price jumps above the level only on the last bar
    let closes = [dec!(90), dec!(95), dec!(99), dec!(120)];
    let result = backtester().run(&series(&closes), &Threshold(dec!(100))).unwrap();

    assert_eq!(result.total_trades, 1);
    assert_eq!(result.trades[0].price, dec!(120));
    assert_eq!(result.final_value, dec!(100000));
}

#[test]
fn test_losing_round_trip_metrics() {
    let closes = [dec!(110), dec!(120), dec!(90), dec!(90)];
    let result = backtester().run(&series(&closes), &Threshold(dec!(100))).unwrap();

    // 90 shares at 110 (size cap 10000 / 110), sold at 90
    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].quantity, 90);
    assert_eq!(result.final_value, dec!(98200));
    assert_eq!(result.total_return, dec!(-0.018));
    assert_eq!(result.win_rate, 0.0);
    assert!(result.max_drawdown > dec!(0));
    assert!(result.var_5 < 0.0);
}

#[test]
fn test_positional_win_rate_config() {
    let config = BacktestConfig {
        win_rate_method: WinRateMethod::Positional,
        ..BacktestConfig::default()
    };
    let closes = [dec!(110), dec!(90), dec!(110), dec!(130), dec!(95)];
    let result = Backtester::new(config, RiskConfig::default())
        .run(&series(&closes), &Threshold(dec!(100)))
        .unwrap();

    // Round trips: 110 -> 90 loses, 110 -> 95 loses
    assert_eq!(result.total_trades, 4);
    assert_eq!(result.win_rate, 0.0);
}

#[test]
fn test_momentum_needs_lookback_bars() {
    let closes = [dec!(100), dec!(110), dec!(120)];
    let result = backtester()
        .run(&series(&closes), &Momentum::new(5, dec!(0.02)))
        .unwrap();
    assert_eq!(result.total_trades, 0);
}

#[test]
fn test_negative_initial_cash_is_rejected() {
    let config = BacktestConfig {
        initial_cash: dec!(-1),
        ..BacktestConfig::default()
    };
    let err = Backtester::new(config, RiskConfig::default())
        .run(&series(&[dec!(100)]), &Threshold(dec!(100)))
        .unwrap_err();

    assert!(matches!(err, BacktestError::InvalidConfig(_)));
    assert!(err.to_string().contains("initial_cash"));
}
