//! Strategy signal types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading decision for the latest bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    /// Exit (or short, where supported)
    Sell,
    /// Do nothing
    #[default]
    Hold,
    /// Enter long
    Buy,
}

impl Signal {
    /// Numeric form in {-1, 0, 1}
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = i8;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(other),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}
