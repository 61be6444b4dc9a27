//! Bar-by-bar backtest loop

use super::analytics::{period_returns, win_rate, BacktestResult};
use super::BacktestError;
use crate::config::{BacktestConfig, Config, RiskConfig};
use crate::data::PriceSeries;
use crate::portfolio::Portfolio;
use crate::risk::RiskManager;
use crate::strategy::{Signal, Strategy};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// Exposure to the traded symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Neutral,
    Long,
}

/// Runs a single-symbol strategy over a price series
#[derive(Debug, Clone)]
pub struct Backtester {
    config: BacktestConfig,
    risk: RiskConfig,
}

impl Backtester {
    pub fn new(config: BacktestConfig, risk: RiskConfig) -> Self {
        Self { config, risk }
    }

    /// Create from the full application config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backtest.clone(), config.risk.clone())
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Replay `series` through `strategy`
    ///
    /// On each bar the strategy sees closes up to and including that bar.
    /// A Buy while neutral opens a risk-sized position; a Sell while long
    /// closes all of it. The portfolio is valued at the bar close after every
    /// step, so `portfolio_values` holds one entry per bar after the initial
    /// cash.
    pub fn run(
        &self,
        series: &PriceSeries,
        strategy: &dyn Strategy,
    ) -> Result<BacktestResult, BacktestError> {
        self.validate()?;

        let symbol = series.symbol();
        let initial_cash = self.config.initial_cash;
        let stop_fraction = Decimal::ONE - self.config.stop_loss_pct;
        let risk_manager = RiskManager::from_config(&self.risk);
        let mut portfolio = Portfolio::new(initial_cash).with_commission(self.config.commission);
        let mut state = PositionState::Neutral;

        tracing::info!(
            symbol,
            strategy = strategy.name(),
            bars = series.len(),
            %initial_cash,
            "Starting backtest"
        );

        let closes = series.closes();
        let mut portfolio_values = Vec::with_capacity(closes.len() + 1);
        portfolio_values.push(initial_cash);

        for (i, bar) in series.bars().iter().enumerate() {
            let price = bar.close;
            let timestamp = bar_timestamp(bar.date);

            match (strategy.signal(&closes[..=i]), state) {
                (Signal::Buy, PositionState::Neutral) => {
                    let stop_loss = price * stop_fraction;
                    let value = portfolio.value_at(symbol, price);
                    let quantity = risk_manager.calculate_position_size(value, price, stop_loss);

                    if quantity > 0 {
                        match portfolio.try_buy_at(symbol, quantity, price, timestamp) {
                            Ok(_) => {
                                tracing::debug!(date = %bar.date, quantity, %price, "Filled BUY");
                                state = PositionState::Long;
                            }
                            Err(e) => {
                                tracing::debug!(date = %bar.date, error = %e, "BUY rejected");
                            }
                        }
                    }
                }
                (Signal::Sell, PositionState::Long) => {
                    let quantity = portfolio.position(symbol);
                    match portfolio.try_sell_at(symbol, quantity, price, timestamp) {
                        Ok(_) => {
                            tracing::debug!(date = %bar.date, quantity, %price, "Filled SELL");
                            state = PositionState::Neutral;
                        }
                        Err(e) => {
                            tracing::debug!(date = %bar.date, error = %e, "SELL rejected");
                        }
                    }
                }
                _ => {}
            }

            portfolio_values.push(portfolio.value_at(symbol, price));
        }

        let returns = period_returns(&portfolio_values);
        let final_value = portfolio_values.last().copied().unwrap_or(initial_cash);
        let trades = portfolio.trades().to_vec();

        let result = BacktestResult {
            symbol: symbol.to_string(),
            strategy: strategy.name().to_string(),
            initial_cash,
            final_value,
            total_return: (final_value - initial_cash) / initial_cash,
            total_trades: trades.len(),
            sharpe_ratio: risk_manager.calculate_sharpe_ratio(&returns, self.config.risk_free_rate),
            max_drawdown: risk_manager.calculate_max_drawdown(&portfolio_values),
            var_5: risk_manager.calculate_var(&returns, self.config.var_confidence),
            win_rate: win_rate(&trades, self.config.win_rate_method),
            portfolio_values,
            trades,
        };

        tracing::info!(
            symbol,
            trades = result.total_trades,
            final_value = %result.final_value,
            total_return = %result.total_return,
            "Backtest complete"
        );

        Ok(result)
    }

    fn validate(&self) -> Result<(), BacktestError> {
        if self.config.initial_cash <= Decimal::ZERO {
            return Err(BacktestError::InvalidConfig(format!(
                "initial_cash must be positive, got {}",
                self.config.initial_cash
            )));
        }
        let stop = self.config.stop_loss_pct;
        if stop <= Decimal::ZERO || stop >= Decimal::ONE {
            return Err(BacktestError::InvalidConfig(format!(
                "stop_loss_pct must be in (0, 1), got {stop}"
            )));
        }
        Ok(())
    }
}

/// Fills are stamped at midnight UTC of the bar date
fn bar_timestamp(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
