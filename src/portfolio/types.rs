//! Portfolio types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Direction of an executed fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Shares bought, cash debited
    Buy,
    /// Shares sold, cash credited
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed fill, immutable once logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Traded symbol
    pub symbol: String,
    /// Buy or sell
    pub action: TradeAction,
    /// Whole shares filled
    pub quantity: u64,
    /// Fill price per share
    pub price: Decimal,
    /// Flat commission charged on this fill
    pub fees: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    /// Gross value of the fill (quantity x price)
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Point-in-time snapshot of the ledger
///
/// `positions` is an owned copy; mutating it never touches the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub cash: Decimal,
    pub positions: HashMap<String, u64>,
    pub total_trades: usize,
}

/// Reasons an order is not filled
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Order for zero shares
    #[error("Zero quantity order for {0}")]
    ZeroQuantity(String),
    /// Cost exceeds available cash
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },
    /// Sell exceeds held shares
    #[error("Insufficient position in {symbol}: hold {held}, requested {requested}")]
    InsufficientPosition {
        symbol: String,
        held: u64,
        requested: u64,
    },
}
