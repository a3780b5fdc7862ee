//! Trades and the sinks that receive them.

use serde::{Deserialize, Serialize};

/// A single execution. The price is always the maker's resting tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Client id of the aggressive (incoming) order
    pub taker_client: u64,
    /// Client id of the resting order that provided liquidity
    pub maker_client: u64,
    /// Filled quantity, always positive
    pub qty: i64,
    /// Tick index the fill occurred at
    pub price_idx: i32,
    /// Execution timestamp, monotonic nanoseconds
    pub ts: u64,
}

/// Consumer of executions emitted by the kernel.
///
/// The kernel calls `on_trade` synchronously, in execution order, while it
/// holds the book; implementations must not call back into the engine.
pub trait TradeSink {
    fn on_trade(&mut self, trade: Trade);
}

/// Adapter turning a closure into a sink, for callers that want executions
/// pushed somewhere other than the owned log.
pub struct FnSink<F: FnMut(Trade)>(pub F);

impl<F: FnMut(Trade)> TradeSink for FnSink<F> {
    #[inline]
    fn on_trade(&mut self, trade: Trade) {
        (self.0)(trade)
    }
}

/// The default sink: an owned append-only buffer of executions.
#[derive(Debug, Default)]
pub struct TradeLog {
    trades: Vec<Trade>,
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room up front; the log is the one container allowed to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            trades: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Hand the accumulated trades to the caller and reset the log.
    pub fn drain(&mut self) -> Vec<Trade> {
        std::mem::take(&mut self.trades)
    }
}

impl TradeSink for TradeLog {
    #[inline]
    fn on_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }
}
