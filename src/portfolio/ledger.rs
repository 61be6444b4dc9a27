//! Cash and share ledger

use super::{PortfolioError, PortfolioSummary, Trade, TradeAction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Cash plus whole-share positions, with an append-only fill log
#[derive(Debug, Clone)]
pub struct Portfolio {
    cash: Decimal,
    commission: Decimal,
    positions: HashMap<String, u64>,
    trades: Vec<Trade>,
}

impl Portfolio {
    /// Create a portfolio holding only cash
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            commission: Decimal::ZERO,
            positions: HashMap::new(),
            trades: vec![],
        }
    }

    /// Charge a flat fee on every fill
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn commission(&self) -> Decimal {
        self.commission
    }

    /// Shares held in `symbol` (0 if none)
    pub fn position(&self, symbol: &str) -> u64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &HashMap<String, u64> {
        &self.positions
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Buy shares, returning false when the order cannot be filled
    pub fn buy(&mut self, symbol: &str, quantity: u64, price: Decimal) -> bool {
        self.try_buy(symbol, quantity, price).is_ok()
    }

    /// Sell shares, returning false when the order cannot be filled
    pub fn sell(&mut self, symbol: &str, quantity: u64, price: Decimal) -> bool {
        self.try_sell(symbol, quantity, price).is_ok()
    }

    pub fn try_buy(
        &mut self,
        symbol: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<Trade, PortfolioError> {
        self.try_buy_at(symbol, quantity, price, Utc::now())
    }

    pub fn try_sell(
        &mut self,
        symbol: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<Trade, PortfolioError> {
        self.try_sell_at(symbol, quantity, price, Utc::now())
    }

    /// Buy `quantity` shares at `price`, stamping the fill with `timestamp`
    ///
    /// State is untouched on error.
    pub fn try_buy_at(
        &mut self,
        symbol: &str,
        quantity: u64,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Trade, PortfolioError> {
        if quantity == 0 {
            return Err(PortfolioError::ZeroQuantity(symbol.to_string()));
        }

        let required = Decimal::from(quantity) * price + self.commission;
        if required > self.cash {
            return Err(PortfolioError::InsufficientFunds {
                required,
                available: self.cash,
            });
        }

        self.cash -= required;
        *self.positions.entry(symbol.to_string()).or_insert(0) += quantity;
        Ok(self.record(symbol, TradeAction::Buy, quantity, price, timestamp))
    }

    /// Sell `quantity` held shares at `price`, stamping the fill with `timestamp`
    ///
    /// The symbol entry is dropped when its count reaches zero. State is
    /// untouched on error.
    pub fn try_sell_at(
        &mut self,
        symbol: &str,
        quantity: u64,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Trade, PortfolioError> {
        if quantity == 0 {
            return Err(PortfolioError::ZeroQuantity(symbol.to_string()));
        }

        let held = self.position(symbol);
        if held < quantity {
            return Err(PortfolioError::InsufficientPosition {
                symbol: symbol.to_string(),
                held,
                requested: quantity,
            });
        }

        let proceeds = Decimal::from(quantity) * price;
        if self.cash + proceeds < self.commission {
            return Err(PortfolioError::InsufficientFunds {
                required: self.commission,
                available: self.cash + proceeds,
            });
        }

        self.cash += proceeds - self.commission;
        let remaining = held - quantity;
        if remaining == 0 {
            self.positions.remove(symbol);
        } else {
            self.positions.insert(symbol.to_string(), remaining);
        }
        Ok(self.record(symbol, TradeAction::Sell, quantity, price, timestamp))
    }

    fn record(
        &mut self,
        symbol: &str,
        action: TradeAction,
        quantity: u64,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Trade {
        let trade = Trade {
            symbol: symbol.to_string(),
            action,
            quantity,
            price,
            fees: self.commission,
            timestamp,
        };
        self.trades.push(trade.clone());
        trade
    }

    /// Market value of the held shares in `symbol`
    pub fn get_position_value(&self, symbol: &str, price: Decimal) -> Decimal {
        Decimal::from(self.position(symbol)) * price
    }

    /// Cash plus every position marked at `prices`
    ///
    /// A held symbol missing from `prices` is valued at zero and logged.
    pub fn get_total_value(&self, prices: &HashMap<String, Decimal>) -> Decimal {
        let mut total = self.cash;
        for (symbol, &quantity) in &self.positions {
            match prices.get(symbol) {
                Some(&price) => total += Decimal::from(quantity) * price,
                None => {
                    tracing::warn!(%symbol, quantity, "No price for held position, valuing at zero");
                }
            }
        }
        total
    }

    /// Cash plus positions, pricing only `symbol`
    pub fn value_at(&self, symbol: &str, price: Decimal) -> Decimal {
        let prices = HashMap::from([(symbol.to_string(), price)]);
        self.get_total_value(&prices)
    }

    pub fn get_summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            cash: self.cash,
            positions: self.positions.clone(),
            total_trades: self.trades.len(),
        }
    }
}
