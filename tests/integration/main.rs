//! Integration test harness

mod backtest_test;
mod e2e_test;
mod portfolio_test;
