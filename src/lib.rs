//! # Tickbook
//!
//! A tick-indexed limit order book matching engine for high-throughput
//! simulation.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one thread owns each kernel exclusively (no locks);
//!   scale out by sharding one kernel per instrument
//! - **Preallocated**: pool, ladder and per-level rings are sized at
//!   construction; the hot path never touches the heap
//! - **Price-Time Priority**: aggressive orders sweep the best opposite
//!   levels first; within a level, makers fill in arrival order
//! - **O(1) Common Path**: pooled slots, ring push/pop and cached best
//!   bid/ask; cancels pay a linear scan of their level, rescans of the
//!   best-price cache are bounded by ladder width
//!
//! ## Architecture
//!
//! ```text
//! [Submitter] --> place / cancel / replace --> [Engine]
//!                                                |-- OrderPool (slab + free list)
//!                                                |-- Ladder (RingLevel per tick)
//!                                                |-- client index
//!                                                `--> TradeSink (TradeLog default)
//! ```

pub mod book;
pub mod engine;
pub mod error;
pub mod level;
pub mod pool;
pub mod price;
pub mod sim;
pub mod trade;
pub mod types;

// Re-exports for convenience
pub use book::Ladder;
pub use engine::{Engine, EngineConfig};
pub use error::EngineError;
pub use level::RingLevel;
pub use pool::{EngineId, Order, OrderPool, NULL_ID};
pub use price::PriceMapper;
pub use sim::{OrderRequest, WorkloadGen};
pub use trade::{FnSink, Trade, TradeLog, TradeSink};
pub use types::{OrderType, Placement, Side, TimeInForce};
