//! Order Pool - preallocated slab of order records with an explicit free list.
//!
//! The pool hands out stable small-integer handles (engine-ids) equal to the
//! slot index, usable as dense keys and as ring-buffer payloads. No heap
//! traffic after construction.

use crate::types::{OrderType, Side, TimeInForce};
use std::fmt;

/// Stable handle for an active pool slot (equals the slot index).
pub type EngineId = u32;

/// Sentinel for "no order" in ring slots that have been vacated.
pub const NULL_ID: EngineId = EngineId::MAX;

/// A single order record (pool slot).
#[derive(Clone, Copy, Debug)]
pub struct Order {
    /// Externally supplied client identifier
    pub client_id: u64,
    /// Slot index in the pool, stable while the slot is active
    pub engine_id: EngineId,
    /// Buy or Sell
    pub side: Side,
    /// Limit or Market
    pub order_type: OrderType,
    /// Residual policy
    pub tif: TimeInForce,
    /// Tick index; -1 for market orders, which carry no price
    pub price_idx: i32,
    /// Remaining quantity
    pub qty: i64,
    /// Arrival timestamp, monotonic nanoseconds
    pub ts: u64,
    /// Set while the slot is resting in the book
    pub active: bool,
}

impl Order {
    /// An empty slot record, used to fill the slab at construction.
    pub const fn vacant() -> Self {
        Self {
            client_id: 0,
            engine_id: NULL_ID,
            side: Side::Buy,
            order_type: OrderType::Limit,
            tif: TimeInForce::GoodForDay,
            price_idx: -1,
            qty: 0,
            ts: 0,
            active: false,
        }
    }
}

/// Fixed-capacity order slab with O(1) allocate and free.
///
/// The free list is an explicit stack of slot indices; allocate pops,
/// free pushes. The free list and the set of active slots partition the
/// slot indices at all times.
pub struct OrderPool {
    slots: Vec<Order>,
    free: Vec<EngineId>,
    capacity: u32,
}

impl OrderPool {
    /// Create a pool holding up to `capacity` concurrently resting orders.
    ///
    /// # Panics
    /// Panics if `capacity` is 0 or would collide with [`NULL_ID`].
    pub fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "pool capacity must be positive");
        assert!(capacity < NULL_ID, "pool capacity must be below NULL_ID");

        let slots = vec![Order::vacant(); capacity as usize];
        // Stack ordered so the lowest index is handed out first.
        let free: Vec<EngineId> = (0..capacity).rev().collect();

        Self { slots, free, capacity }
    }

    /// Reserve a slot and copy `order` into it.
    ///
    /// Stamps `engine_id` with the slot index and marks the slot active.
    /// Returns `None` when the free list is empty.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn allocate(&mut self, order: Order) -> Option<EngineId> {
        let id = self.free.pop()?;
        let slot = &mut self.slots[id as usize];
        *slot = order;
        slot.engine_id = id;
        slot.active = true;
        Some(id)
    }

    /// Return a slot to the free list, clearing its active flag and quantity.
    ///
    /// # Complexity
    /// O(1)
    #[inline]
    pub fn free(&mut self, id: EngineId) {
        debug_assert!(id < self.capacity, "engine id out of bounds");
        debug_assert!(self.slots[id as usize].active, "double free");
        let slot = &mut self.slots[id as usize];
        slot.active = false;
        slot.qty = 0;
        self.free.push(id);
    }

    /// O(1) slot access.
    #[inline]
    pub fn get(&self, id: EngineId) -> &Order {
        debug_assert!(id < self.capacity, "engine id out of bounds");
        &self.slots[id as usize]
    }

    /// O(1) mutable slot access.
    #[inline]
    pub fn get_mut(&mut self, id: EngineId) -> &mut Order {
        debug_assert!(id < self.capacity, "engine id out of bounds");
        &mut self.slots[id as usize]
    }

    /// Number of currently active slots.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.capacity as usize - self.free.len()
    }

    /// Total slot count.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// True when no slot is free.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Verify that the free list and the active slots partition the pool.
    ///
    /// Intended for tests and debugging; panics on violation.
    pub fn audit_partition(&self) {
        let mut on_free_list = vec![false; self.capacity as usize];
        for &id in &self.free {
            assert!(!on_free_list[id as usize], "slot {id} listed free twice");
            on_free_list[id as usize] = true;
        }
        for (i, slot) in self.slots.iter().enumerate() {
            assert_ne!(
                slot.active, on_free_list[i],
                "slot {i}: active flag and free list disagree"
            );
        }
    }
}

impl fmt::Debug for OrderPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderPool")
            .field("capacity", &self.capacity)
            .field("in_use", &self.in_use())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(client_id: u64, qty: i64) -> Order {
        Order {
            client_id,
            qty,
            price_idx: 100,
            ..Order::vacant()
        }
    }

    #[test]
    fn test_pool_creation() {
        let pool = OrderPool::new(100);
        assert_eq!(pool.capacity(), 100);
        assert_eq!(pool.in_use(), 0);
        assert!(!pool.is_full());
        pool.audit_partition();
    }

    #[test]
    fn test_allocate_lowest_first() {
        let mut pool = OrderPool::new(4);
        assert_eq!(pool.allocate(order(1, 10)), Some(0));
        assert_eq!(pool.allocate(order(2, 10)), Some(1));
    }

    #[test]
    fn test_allocate_stamps_slot() {
        let mut pool = OrderPool::new(10);
        let id = pool.allocate(order(42, 7)).unwrap();
        let slot = pool.get(id);
        assert_eq!(slot.client_id, 42);
        assert_eq!(slot.qty, 7);
        assert_eq!(slot.engine_id, id);
        assert!(slot.active);
    }

    #[test]
    fn test_exhaustion_and_reuse() {
        let mut pool = OrderPool::new(3);
        let a = pool.allocate(order(1, 1)).unwrap();
        let _b = pool.allocate(order(2, 1)).unwrap();
        let _c = pool.allocate(order(3, 1)).unwrap();
        assert!(pool.is_full());
        assert!(pool.allocate(order(4, 1)).is_none());

        pool.free(a);
        assert_eq!(pool.in_use(), 2);
        assert!(!pool.get(a).active);
        assert_eq!(pool.get(a).qty, 0);

        // Freed slot is handed out again
        assert_eq!(pool.allocate(order(5, 1)), Some(a));
        pool.audit_partition();
    }

    #[test]
    fn test_free_clears_quantity() {
        let mut pool = OrderPool::new(2);
        let id = pool.allocate(order(9, 500)).unwrap();
        pool.free(id);
        assert_eq!(pool.get(id).qty, 0);
        assert!(!pool.get(id).active);
        pool.audit_partition();
    }
}
