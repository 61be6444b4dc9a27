//! Integration tests for the portfolio ledger and risk manager

use backtest_lab::portfolio::{Portfolio, PortfolioError, TradeAction};
use backtest_lab::risk::RiskManager;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

#[test]
fn test_sized_buy_respects_position_limit() {
    let mut portfolio = Portfolio::new(dec!(100000));
    let rm = RiskManager::default();

    let price = dec!(50);
    let value = portfolio.value_at("AAPL", price);
    let quantity = rm.calculate_position_size(value, price, price * dec!(0.95));
    assert_eq!(quantity, 200);
    assert!(portfolio.buy("AAPL", quantity, price));

    let prices: HashMap<String, Decimal> = [("AAPL".to_string(), price)].into();
    let total = portfolio.get_total_value(&prices);
    assert_eq!(total, dec!(100000));

    let flags = rm.check_position_limits(total, portfolio.positions(), &prices);
    assert!(!flags["AAPL"]);
    assert!(rm
        .suggest_rebalancing(total, portfolio.positions(), &prices)
        .is_empty());
}

#[test]
fn test_rally_pushes_position_over_limit() {
    let mut portfolio = Portfolio::new(dec!(100000));
    let rm = RiskManager::default();
    assert!(portfolio.buy("AAPL", 200, dec!(50)));

    // 200 * 100 = 20000 of 110000 is 18%
    let prices: HashMap<String, Decimal> = [("AAPL".to_string(), dec!(100))].into();
    let total = portfolio.get_total_value(&prices);
    assert_eq!(total, dec!(110000));

    let flags = rm.check_position_limits(total, portfolio.positions(), &prices);
    assert!(flags["AAPL"]);

    // target = floor(11000 / 100) = 110
    let deltas = rm.suggest_rebalancing(total, portfolio.positions(), &prices);
    assert_eq!(deltas["AAPL"], -90);

    assert!(portfolio.sell("AAPL", 90, dec!(100)));
    let flags = rm.check_position_limits(
        portfolio.get_total_value(&prices),
        portfolio.positions(),
        &prices,
    );
    assert!(!flags["AAPL"]);
}

#[test]
fn test_rejected_orders_leave_no_trace() {
    let mut portfolio = Portfolio::new(dec!(1000)).with_commission(dec!(1));

    assert!(matches!(
        portfolio.try_buy("AAPL", 10, dec!(100)),
        Err(PortfolioError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        portfolio.try_sell("AAPL", 1, dec!(100)),
        Err(PortfolioError::InsufficientPosition { .. })
    ));
    assert!(matches!(
        portfolio.try_buy("AAPL", 0, dec!(100)),
        Err(PortfolioError::ZeroQuantity(_))
    ));

    let summary = portfolio.get_summary();
    assert_eq!(summary.cash, dec!(1000));
    assert!(summary.positions.is_empty());
    assert_eq!(summary.total_trades, 0);
}

#[test]
fn test_trade_log_records_fills_in_order() {
    let mut portfolio = Portfolio::new(dec!(10000));
    assert!(portfolio.buy("AAPL", 10, dec!(100)));
    assert!(portfolio.buy("MSFT", 5, dec!(300)));
    assert!(portfolio.sell("AAPL", 10, dec!(105)));

    let actions: Vec<_> = portfolio
        .trades()
        .iter()
        .map(|t| (t.symbol.as_str(), t.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("AAPL", TradeAction::Buy),
            ("MSFT", TradeAction::Buy),
            ("AAPL", TradeAction::Sell),
        ]
    );
    assert_eq!(portfolio.cash(), dec!(8550));
    assert_eq!(portfolio.position("AAPL"), 0);
    assert_eq!(portfolio.position("MSFT"), 5);
}
