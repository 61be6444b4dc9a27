//! Backtest analytics and reporting

use crate::config::WinRateMethod;
use crate::portfolio::{Trade, TradeAction};
use crate::risk::TRADING_DAYS_PER_YEAR;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Complete backtest results
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    /// Traded symbol
    pub symbol: String,
    /// Strategy name
    pub strategy: String,
    /// Starting cash
    pub initial_cash: Decimal,
    /// Portfolio value after the last bar
    pub final_value: Decimal,
    /// (final - initial) / initial
    pub total_return: Decimal,
    /// Number of fills
    pub total_trades: usize,
    /// Initial cash followed by one valuation per bar
    pub portfolio_values: Vec<Decimal>,
    /// Fill log in execution order
    pub trades: Vec<Trade>,
    /// Per-bar Sharpe ratio
    pub sharpe_ratio: f64,
    /// Maximum drawdown fraction
    pub max_drawdown: Decimal,
    /// Historical VaR of per-bar returns
    pub var_5: f64,
    /// Fraction of completed round trips with positive P&L
    pub win_rate: f64,
}

impl BacktestResult {
    /// Per-bar returns of the value series
    pub fn returns(&self) -> Vec<f64> {
        period_returns(&self.portfolio_values)
    }

    /// Sharpe ratio scaled by sqrt(252)
    pub fn annualized_sharpe(&self) -> f64 {
        self.sharpe_ratio * TRADING_DAYS_PER_YEAR.sqrt()
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               BACKTEST RESULTS
══════════════════════════════════════════════════════
Symbol:           {}
Strategy:         {}
Initial Capital:  {:.2}
Final Value:      {:.2}
Total Return:     {:+.2}%
Total Trades:     {}

RISK METRICS
───────────────────────────────────────────────────────
Sharpe Ratio:     {:.3}
Max Drawdown:     {:.2}%
VaR (5%):         {:.2}%
Win Rate:         {:.2}%
══════════════════════════════════════════════════════
"#,
            self.symbol,
            self.strategy,
            self.initial_cash,
            self.final_value,
            self.total_return * dec!(100),
            self.total_trades,
            self.sharpe_ratio,
            self.max_drawdown * dec!(100),
            self.var_5 * 100.0,
            self.win_rate * 100.0,
        )
    }
}

/// Simple returns between consecutive values
///
/// A zero previous value yields a 0 return for that step.
pub fn period_returns(values: &[Decimal]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| {
            if pair[0].is_zero() {
                0.0
            } else {
                ((pair[1] - pair[0]) / pair[0]).to_f64().unwrap_or(0.0)
            }
        })
        .collect()
}

/// Share of completed round trips that made money
///
/// Fewer than 2 trades, or no completed round trip, gives 0.
pub fn win_rate(trades: &[Trade], method: WinRateMethod) -> f64 {
    if trades.len() < 2 {
        return 0.0;
    }

    let (wins, completed) = match method {
        WinRateMethod::Positional => positional_outcomes(trades),
        WinRateMethod::Matched => matched_outcomes(trades),
    };

    if completed == 0 {
        0.0
    } else {
        wins as f64 / completed as f64
    }
}

/// Pairs log entries (0,1), (2,3), ... regardless of symbol
///
/// Within a pair the BUY is the entry and the SELL the exit; a pair without
/// one of each is skipped. Profit uses the buy quantity.
fn positional_outcomes(trades: &[Trade]) -> (usize, usize) {
    let mut wins = 0;
    let mut completed = 0;

    for pair in trades.chunks_exact(2) {
        let (first, second) = (&pair[0], &pair[1]);
        let buy = if first.action == TradeAction::Buy { first } else { second };
        let sell = if second.action == TradeAction::Sell { second } else { first };

        if buy.action == TradeAction::Buy && sell.action == TradeAction::Sell {
            let profit = (sell.price - buy.price) * Decimal::from(buy.quantity);
            if profit > Decimal::ZERO {
                wins += 1;
            }
            completed += 1;
        }
    }

    (wins, completed)
}

/// Matches each sell FIFO against open buy lots of the same symbol
///
/// Every sell that closes at least one share is one completed trade.
fn matched_outcomes(trades: &[Trade]) -> (usize, usize) {
    let mut lots: HashMap<&str, VecDeque<(Decimal, u64)>> = HashMap::new();
    let mut wins = 0;
    let mut completed = 0;

    for trade in trades {
        let open = lots.entry(trade.symbol.as_str()).or_default();
        match trade.action {
            TradeAction::Buy => open.push_back((trade.price, trade.quantity)),
            TradeAction::Sell => {
                let mut remaining = trade.quantity;
                let mut closed = 0u64;
                let mut pnl = Decimal::ZERO;

                while remaining > 0 {
                    let Some(lot) = open.front_mut() else { break };
                    let take = remaining.min(lot.1);
                    pnl += (trade.price - lot.0) * Decimal::from(take);
                    lot.1 -= take;
                    remaining -= take;
                    closed += take;
                    if lot.1 == 0 {
                        open.pop_front();
                    }
                }

                if closed > 0 {
                    completed += 1;
                    if pnl > Decimal::ZERO {
                        wins += 1;
                    }
                }
            }
        }
    }

    (wins, completed)
}
