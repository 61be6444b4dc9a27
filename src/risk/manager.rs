//! Position sizing and exposure limits

use super::metrics;
use crate::config::RiskConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Risk budget for a single run, fixed at construction
#[derive(Debug, Clone)]
pub struct RiskManager {
    /// Max fraction of portfolio value held in one position
    max_position_size: Decimal,
    /// Max fraction of portfolio value lost if a stop is hit
    max_portfolio_risk: Decimal,
}

impl RiskManager {
    /// Create a risk manager with explicit limits
    pub fn new(max_position_size: Decimal, max_portfolio_risk: Decimal) -> Self {
        Self {
            max_position_size,
            max_portfolio_risk,
        }
    }

    /// Create from RiskConfig
    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.max_position_size, config.max_portfolio_risk)
    }

    pub fn max_position_size(&self) -> Decimal {
        self.max_position_size
    }

    pub fn max_portfolio_risk(&self) -> Decimal {
        self.max_portfolio_risk
    }

    /// Whole shares to buy at `entry_price` with a stop at `stop_loss`
    ///
    /// Smaller of two caps:
    /// - risk: `floor(value * max_portfolio_risk / |entry - stop|)`
    /// - exposure: `floor(value * max_position_size / entry)`
    ///
    /// Returns 0 when the stop equals the entry or the entry price is not
    /// positive.
    pub fn calculate_position_size(
        &self,
        portfolio_value: Decimal,
        entry_price: Decimal,
        stop_loss: Decimal,
    ) -> u64 {
        let risk_per_share = (entry_price - stop_loss).abs();
        if risk_per_share.is_zero() || entry_price <= Decimal::ZERO {
            return 0;
        }

        let max_risk_amount = portfolio_value * self.max_portfolio_risk;
        let max_shares_by_risk = whole_shares(max_risk_amount / risk_per_share);

        let max_position_value = portfolio_value * self.max_position_size;
        let max_shares_by_size = whole_shares(max_position_value / entry_price);

        max_shares_by_risk.min(max_shares_by_size)
    }

    /// Historical VaR, see [`metrics::value_at_risk`]
    pub fn calculate_var(&self, returns: &[f64], confidence_level: f64) -> f64 {
        metrics::value_at_risk(returns, confidence_level)
    }

    /// Sharpe ratio, see [`metrics::sharpe_ratio`]
    pub fn calculate_sharpe_ratio(&self, returns: &[f64], risk_free_rate: f64) -> f64 {
        metrics::sharpe_ratio(returns, risk_free_rate)
    }

    /// Max drawdown, see [`metrics::max_drawdown`]
    pub fn calculate_max_drawdown(&self, values: &[Decimal]) -> Decimal {
        metrics::max_drawdown(values)
    }

    /// Flag each priced position whose weight exceeds `max_position_size`
    ///
    /// Unpriced symbols are skipped. A non-positive portfolio value gives an
    /// empty map since weights are undefined.
    pub fn check_position_limits(
        &self,
        portfolio_value: Decimal,
        positions: &HashMap<String, u64>,
        prices: &HashMap<String, Decimal>,
    ) -> HashMap<String, bool> {
        self.weights(portfolio_value, positions, prices)
            .map(|(symbol, _, _, weight)| {
                (symbol.clone(), weight > self.max_position_size)
            })
            .collect()
    }

    /// Share delta bringing each over-limit position back to the limit
    ///
    /// Negative deltas are sell-downs. Positions within limits get no entry.
    pub fn suggest_rebalancing(
        &self,
        portfolio_value: Decimal,
        positions: &HashMap<String, u64>,
        prices: &HashMap<String, Decimal>,
    ) -> HashMap<String, i64> {
        self.weights(portfolio_value, positions, prices)
            .filter(|(_, _, _, weight)| *weight > self.max_position_size)
            .map(|(symbol, quantity, price, _)| {
                let target = (portfolio_value * self.max_position_size / price)
                    .floor()
                    .to_i64()
                    .unwrap_or(0);
                (symbol.clone(), target - quantity as i64)
            })
            .collect()
    }

    fn weights<'a>(
        &self,
        portfolio_value: Decimal,
        positions: &'a HashMap<String, u64>,
        prices: &'a HashMap<String, Decimal>,
    ) -> impl Iterator<Item = (&'a String, u64, Decimal, Decimal)> + 'a {
        let valid = portfolio_value > Decimal::ZERO;
        positions
            .iter()
            .filter(move |_| valid)
            .filter_map(move |(symbol, &quantity)| {
                let Some(&price) = prices.get(symbol) else {
                    tracing::warn!(%symbol, quantity, "No price for position, skipping");
                    return None;
                };
                let weight = Decimal::from(quantity) * price / portfolio_value;
                Some((symbol, quantity, price, weight))
            })
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self {
            max_position_size: dec!(0.10), // 10% per position
            max_portfolio_risk: dec!(0.02), // 2% risked per trade
        }
    }
}

fn whole_shares(shares: Decimal) -> u64 {
    shares.floor().to_u64().unwrap_or(0)
}
