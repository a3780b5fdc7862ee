//! Matching Kernel - placement, matching, cancel, replace and best-price
//! maintenance.
//!
//! The kernel owns the pool, the ladder, the client index and the trade
//! sink, and is driven synchronously from one thread: every operation runs
//! to completion before the next is accepted. Matching follows price-time
//! priority: the aggressive order consumes the best opposite level first,
//! and within a level makers fill in arrival order.

use rustc_hash::FxHashMap;

use crate::book::Ladder;
use crate::error::EngineError;
use crate::pool::{EngineId, Order, OrderPool, NULL_ID};
use crate::trade::{Trade, TradeLog, TradeSink};
use crate::types::{OrderType, Placement, Side, TimeInForce};

/// Construction-time sizing, fixed for the lifetime of the instance.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Ladder width in ticks; must be odd so a middle tick exists
    pub levels: i32,
    /// Resting orders per price level (power-of-two recommended)
    pub ring_capacity: usize,
    /// Maximum concurrently resting orders
    pub pool_capacity: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            levels: 20_001,
            ring_capacity: 1024,
            pool_capacity: 1 << 20,
        }
    }
}

/// The matching kernel for one instrument.
///
/// Generic over the trade sink; the default is the owned [`TradeLog`].
/// Parallelism, if wanted, is one kernel per instrument - never intra-kernel.
pub struct Engine<S: TradeSink = TradeLog> {
    pool: OrderPool,
    book: Ladder,
    clients: FxHashMap<u64, EngineId>,
    sink: S,
}

impl Engine<TradeLog> {
    /// Create a kernel that records executions in an owned trade log.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, TradeLog::new())
    }

    /// All executions to date, in the order they occurred.
    #[inline]
    pub fn trades(&self) -> &[Trade] {
        self.sink.as_slice()
    }

    /// Hand the accumulated trades to the caller and reset the log.
    pub fn drain_trades(&mut self) -> Vec<Trade> {
        self.sink.drain()
    }
}

impl<S: TradeSink> Engine<S> {
    /// Create a kernel that forwards executions to `sink`.
    pub fn with_sink(config: EngineConfig, sink: S) -> Self {
        Self {
            pool: OrderPool::new(config.pool_capacity),
            book: Ladder::new(config.levels, config.ring_capacity),
            clients: FxHashMap::default(),
            sink,
        }
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place a limit order: match against the opposite side up to
    /// `price_idx`, then handle the residual per `tif`.
    pub fn place_limit(
        &mut self,
        client_id: u64,
        side: Side,
        price_idx: i32,
        qty: i64,
        ts: u64,
        tif: TimeInForce,
    ) -> Result<Placement, EngineError> {
        if qty <= 0 {
            return Err(EngineError::InvalidQuantity { qty });
        }
        if !self.book.valid_idx(price_idx) {
            return Err(EngineError::InvalidPrice {
                idx: price_idx,
                levels: self.book.levels(),
            });
        }

        // Fill-or-kill commits to nothing unless the whole quantity is
        // immediately available within the limit.
        if tif == TimeInForce::FillOrKill {
            let available = self.available_within_limit(side, price_idx, qty);
            if available < qty {
                return Err(EngineError::KilledByFok {
                    available,
                    requested: qty,
                });
            }
        }

        let mut taker = Order {
            client_id,
            engine_id: NULL_ID,
            side,
            order_type: OrderType::Limit,
            tif,
            price_idx,
            qty,
            ts,
            active: false,
        };
        let (trades, filled) = self.sweep(&mut taker, Some(price_idx));

        let mut rested = false;
        let mut resting_qty = 0;
        if taker.qty > 0 && tif == TimeInForce::GoodForDay {
            let residual = taker.qty;
            let id = self
                .pool
                .allocate(taker)
                .ok_or(EngineError::PoolExhausted { filled })?;
            if !self.book.level_mut(side, price_idx).push(id, residual) {
                // Matches already performed stand; only the residual is lost.
                self.pool.free(id);
                return Err(EngineError::LevelOverflow { filled });
            }
            self.book.update_best_after_add(side, price_idx);
            self.clients.insert(client_id, id);
            rested = true;
            resting_qty = residual;
        }

        Ok(Placement {
            trades,
            filled_qty: filled,
            rested,
            resting_qty,
        })
    }

    /// Place a market order: match without a price constraint; any unfilled
    /// remainder is discarded - a market order never rests.
    pub fn place_market(
        &mut self,
        client_id: u64,
        side: Side,
        qty: i64,
        ts: u64,
    ) -> Result<Placement, EngineError> {
        if qty <= 0 {
            return Err(EngineError::InvalidQuantity { qty });
        }

        let mut taker = Order {
            client_id,
            engine_id: NULL_ID,
            side,
            order_type: OrderType::Market,
            tif: TimeInForce::ImmediateOrCancel,
            price_idx: -1,
            qty,
            ts,
            active: false,
        };
        let (trades, filled) = self.sweep(&mut taker, None);

        Ok(Placement {
            trades,
            filled_qty: filled,
            rested: false,
            resting_qty: 0,
        })
    }

    // ========================================================================
    // Cancel / Replace
    // ========================================================================

    /// Cancel the client's resting order. Returns false when the client has
    /// none; a stale index entry is erased lazily and reported as absent.
    pub fn cancel(&mut self, client_id: u64) -> bool {
        let Some(&id) = self.clients.get(&client_id) else {
            return false;
        };
        let slot = self.pool.get(id);
        if !slot.active || slot.client_id != client_id {
            // Slot was reaped (or recycled) since the entry was written.
            self.clients.remove(&client_id);
            return false;
        }
        let (side, idx, qty) = (slot.side, slot.price_idx, slot.qty);

        if !self.book.level_mut(side, idx).remove(id, qty) {
            self.pool.free(id);
            self.clients.remove(&client_id);
            return false;
        }
        if self.book.level(side, idx).is_empty() {
            self.book.update_best_after_remove(side, idx);
        }
        self.pool.free(id);
        self.clients.remove(&client_id);
        true
    }

    /// Cancel the client's resting order and submit a fresh limit at the new
    /// price and quantity, keeping the captured side and time-in-force. The
    /// new order joins the tail of its destination level: a replace always
    /// forfeits time priority.
    ///
    /// Returns false - leaving any resting order untouched - when the client
    /// has no active order or the new price or quantity is invalid.
    pub fn replace(
        &mut self,
        client_id: u64,
        new_price_idx: i32,
        new_qty: i64,
        ts: u64,
    ) -> bool {
        if new_qty <= 0 || !self.book.valid_idx(new_price_idx) {
            return false;
        }
        let Some(&id) = self.clients.get(&client_id) else {
            return false;
        };
        let slot = self.pool.get(id);
        if !slot.active || slot.client_id != client_id {
            self.clients.remove(&client_id);
            return false;
        }
        let (side, tif) = (slot.side, slot.tif);

        self.cancel(client_id);
        // The cancel freed a slot, so the pool cannot be exhausted here; a
        // full destination ring drops the residual after any matches, as a
        // direct placement would.
        let _ = self.place_limit(client_id, side, new_price_idx, new_qty, ts, tif);
        true
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// Most aggressive tick with resting buy quantity.
    #[inline]
    pub fn best_bid(&self) -> Option<i32> {
        self.book.best(Side::Buy)
    }

    /// Most aggressive tick with resting sell quantity.
    #[inline]
    pub fn best_ask(&self) -> Option<i32> {
        self.book.best(Side::Sell)
    }

    /// Aggregate resting quantity at a tick; 0 for out-of-range indices.
    #[inline]
    pub fn level_quantity(&self, side: Side, price_idx: i32) -> i64 {
        if self.book.valid_idx(price_idx) {
            self.book.level(side, price_idx).total_qty()
        } else {
            0
        }
    }

    /// Number of currently resting orders.
    #[inline]
    pub fn resting_orders(&self) -> usize {
        self.pool.in_use()
    }

    /// Ladder width in ticks.
    #[inline]
    pub fn levels(&self) -> i32 {
        self.book.levels()
    }

    // ========================================================================
    // Matching internals
    // ========================================================================

    /// Consume liquidity from the opposite side while the taker has quantity
    /// and the best opposite level satisfies `limit` (no constraint for
    /// market orders). Returns (trade count, filled quantity).
    fn sweep(&mut self, taker: &mut Order, limit: Option<i32>) -> (u32, i64) {
        let opp = taker.side.opposite();
        let mut trades = 0u32;
        let mut filled = 0i64;

        while taker.qty > 0 {
            let Some(best) = self.book.best(opp) else {
                break;
            };
            if let Some(limit) = limit {
                let crosses = match taker.side {
                    Side::Buy => best <= limit,
                    Side::Sell => best >= limit,
                };
                if !crosses {
                    break;
                }
            }
            if self.book.level(opp, best).is_empty() {
                self.book.update_best_after_remove(opp, best);
                continue;
            }

            let maker_id = self.book.level(opp, best).front();
            let maker = self.pool.get_mut(maker_id);
            let fill = maker.qty.min(taker.qty);
            maker.qty -= fill;
            let maker_client = maker.client_id;
            let maker_done = maker.qty == 0;

            taker.qty -= fill;
            filled += fill;
            trades += 1;
            self.sink.on_trade(Trade {
                taker_client: taker.client_id,
                maker_client,
                qty: fill,
                price_idx: best,
                ts: taker.ts,
            });

            let level = self.book.level_mut(opp, best);
            level.reduce_total(fill);
            if maker_done {
                level.pop_front(0);
                self.pool.free(maker_id);
                self.clients.remove(&maker_client);
            }
            if self.book.level(opp, best).is_empty() {
                self.book.update_best_after_remove(opp, best);
            }
        }

        (trades, filled)
    }

    /// Cumulative opposite quantity at ticks satisfying the taker's limit,
    /// walking from the best toward worse prices. Stops early once `want`
    /// is covered.
    fn available_within_limit(&self, taker_side: Side, limit: i32, want: i64) -> i64 {
        let opp = taker_side.opposite();
        let Some(best) = self.book.best(opp) else {
            return 0;
        };
        let mut available = 0i64;
        match taker_side {
            Side::Buy => {
                let mut idx = best;
                while idx <= limit {
                    available += self.book.level(opp, idx).total_qty();
                    if available >= want {
                        break;
                    }
                    idx += 1;
                }
            }
            Side::Sell => {
                let mut idx = best;
                while idx >= limit {
                    available += self.book.level(opp, idx).total_qty();
                    if available >= want {
                        break;
                    }
                    idx -= 1;
                }
            }
        }
        available
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Verify the mutual consistency of ladder, per-level FIFOs, pool and
    /// client index. Panics on violation; intended for tests and debugging.
    pub fn check_invariants(&self) {
        self.pool.audit_partition();

        let mut referenced = vec![0u32; self.pool.capacity() as usize];
        for side in [Side::Buy, Side::Sell] {
            let mut actual_best = None;
            for idx in 0..self.book.levels() {
                let level = self.book.level(side, idx);
                let mut sum = 0i64;
                for id in level.iter() {
                    let slot = self.pool.get(id);
                    assert!(slot.active, "resting id {id} points at an inactive slot");
                    assert!(slot.qty > 0, "resting id {id} has non-positive quantity");
                    assert_eq!(slot.side, side, "resting id {id} on the wrong side");
                    assert_eq!(slot.price_idx, idx, "resting id {id} at the wrong tick");
                    referenced[id as usize] += 1;
                    sum += slot.qty;
                }
                assert_eq!(
                    sum,
                    level.total_qty(),
                    "level total out of sync at ({side:?}, {idx})"
                );
                if !level.is_empty() {
                    match side {
                        Side::Buy => actual_best = Some(idx),
                        Side::Sell => {
                            if actual_best.is_none() {
                                actual_best = Some(idx);
                            }
                        }
                    }
                }
            }
            assert_eq!(
                self.book.best(side),
                actual_best,
                "cached best out of sync on {side:?}"
            );
        }

        for (id, &count) in referenced.iter().enumerate() {
            let active = self.pool.get(id as EngineId).active;
            assert!(count <= 1, "engine id {id} rests in {count} queues");
            assert_eq!(
                active,
                count == 1,
                "engine id {id}: active flag and queue membership disagree"
            );
        }

        for (&client, &id) in &self.clients {
            let slot = self.pool.get(id);
            assert!(slot.active, "client {client} indexed to inactive slot {id}");
            assert_eq!(
                slot.client_id, client,
                "client {client} indexed to a foreign slot"
            );
        }

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(bid < ask, "book crossed at rest: bid {bid} >= ask {ask}");
        }
    }
}
