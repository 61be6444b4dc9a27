//! Portfolio ledger
//!
//! Cash, whole-share positions, and the fill log

mod ledger;
mod types;

pub use ledger::Portfolio;
pub use types::{PortfolioError, PortfolioSummary, Trade, TradeAction};
