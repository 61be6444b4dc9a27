//! End-to-end integration tests

use backtest_lab::backtest::Backtester;
use backtest_lab::cli::load_series;
use backtest_lab::config::{Config, StrategyKind, WinRateMethod};
use backtest_lab::data::{write_csv, SyntheticGenerator};
use backtest_lab::strategy::create_strategy;
use rust_decimal_macros::dec;

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();

    assert_eq!(config.backtest.symbol, "AAPL");
    assert_eq!(config.backtest.initial_cash, dec!(100000));
    assert_eq!(config.backtest.stop_loss_pct, dec!(0.05));
    assert_eq!(config.backtest.win_rate_method, WinRateMethod::Matched);
    assert_eq!(config.risk.max_position_size, dec!(0.10));
    assert_eq!(config.strategy.kind, StrategyKind::MovingAverage);
    assert_eq!(config.data.days, 252);
    assert!(config.data.csv_path.is_none());
}

#[test]
fn test_every_strategy_runs_on_synthetic_data() {
    for kind in [StrategyKind::MovingAverage, StrategyKind::Momentum, StrategyKind::Rsi] {
        let mut config = Config::default();
        config.strategy.kind = kind;

        let series = load_series(&config).unwrap();
        let strategy = create_strategy(&config.strategy);
        let result = Backtester::from_config(&config)
            .run(&series, strategy.as_ref())
            .unwrap();

        assert_eq!(result.portfolio_values.len(), series.len() + 1);
        assert_eq!(result.total_trades, result.trades.len());
        assert_eq!(result.final_value, *result.portfolio_values.last().unwrap());
        assert!(result.max_drawdown >= dec!(0) && result.max_drawdown <= dec!(1));
        assert!((0.0..=1.0).contains(&result.win_rate));

        // Fills alternate BUY, SELL, BUY, ... for a long-only single symbol
        for (i, trade) in result.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { "BUY" } else { "SELL" };
            assert_eq!(trade.action.to_string(), expected);
        }
    }
}

#[test]
fn test_same_seed_same_result() {
    let config = Config::default();
    let strategy = create_strategy(&config.strategy);
    let backtester = Backtester::from_config(&config);

    let a = backtester
        .run(&load_series(&config).unwrap(), strategy.as_ref())
        .unwrap();
    let b = backtester
        .run(&load_series(&config).unwrap(), strategy.as_ref())
        .unwrap();

    assert_eq!(a.portfolio_values, b.portfolio_values);
    assert_eq!(a.trades.len(), b.trades.len());
}

#[test]
fn test_csv_file_drives_backtest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("msft.csv");
    let series = SyntheticGenerator::new(9).with_days(120).generate("MSFT").unwrap();
    write_csv(&series, &path).unwrap();

    let mut config = Config::default();
    config.backtest.symbol = "MSFT".to_string();
    config.data.csv_path = Some(path);

    let loaded = load_series(&config).unwrap();
    let strategy = create_strategy(&config.strategy);
    let from_csv = Backtester::from_config(&config)
        .run(&loaded, strategy.as_ref())
        .unwrap();
    let direct = Backtester::from_config(&config)
        .run(&series, strategy.as_ref())
        .unwrap();

    assert_eq!(from_csv.symbol, "MSFT");
    assert_eq!(from_csv.portfolio_values, direct.portfolio_values);
}

#[test]
fn test_result_serializes_to_json() {
    let config = Config::default();
    let series = load_series(&config).unwrap();
    let strategy = create_strategy(&config.strategy);
    let result = Backtester::from_config(&config)
        .run(&series, strategy.as_ref())
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["strategy"], "moving_average");
    assert_eq!(
        json["portfolio_values"].as_array().unwrap().len(),
        series.len() + 1
    );
    assert!(json["sharpe_ratio"].is_number());
}
