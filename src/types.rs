//! Order taxonomy and placement reports.

use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    Buy = 0,
    /// Sell side (asks)
    Sell = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type determines whether a price constraint applies during matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    /// Limit order - matches up to its price, may rest (default)
    #[default]
    Limit = 0,
    /// Market order - matches at any price, never rests
    Market = 1,
}

/// Time-in-force policy for the residual of a limit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimeInForce {
    /// Rest any residual in the book (default)
    #[default]
    GoodForDay = 0,
    /// Discard any residual silently
    ImmediateOrCancel = 1,
    /// Require the full quantity to be immediately fillable, or do nothing
    FillOrKill = 2,
}

/// Report for an accepted placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Placement {
    /// Number of trades executed while crossing
    pub trades: u32,
    /// Total quantity filled while crossing
    pub filled_qty: i64,
    /// Whether a residual was added to the book
    pub rested: bool,
    /// Residual quantity now resting (0 unless `rested`)
    pub resting_qty: i64,
}
