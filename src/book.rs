//! Order Book - tick-indexed price ladders with cached best prices.
//!
//! One `RingLevel` per tick per side. For bids a higher index is more
//! aggressive; for asks a lower index is. The cached bests make the common
//! path O(1): adds only improve the cache, removes rescan toward the
//! less-aggressive direction and only when the cached best level emptied.

use crate::level::RingLevel;
use crate::types::Side;

/// Two price ladders plus best-price caches.
#[derive(Debug)]
pub struct Ladder {
    levels: i32,
    bids: Vec<RingLevel>,
    asks: Vec<RingLevel>,
    best_bid: Option<i32>,
    best_ask: Option<i32>,
}

impl Ladder {
    /// Create a ladder `levels` ticks wide, each level holding up to
    /// `ring_capacity` resting orders.
    ///
    /// # Panics
    /// Panics unless `levels` is odd and positive (a middle tick must exist).
    pub fn new(levels: i32, ring_capacity: usize) -> Self {
        assert!(levels > 0, "ladder must have at least one level");
        assert!(levels % 2 == 1, "ladder width must be odd");

        Self {
            levels,
            bids: vec![RingLevel::new(ring_capacity); levels as usize],
            asks: vec![RingLevel::new(ring_capacity); levels as usize],
            best_bid: None,
            best_ask: None,
        }
    }

    /// Ladder width in ticks.
    #[inline]
    pub fn levels(&self) -> i32 {
        self.levels
    }

    /// True if `idx` addresses a tick on the ladder.
    #[inline]
    pub fn valid_idx(&self, idx: i32) -> bool {
        (0..self.levels).contains(&idx)
    }

    /// Most aggressive tick with resting quantity on `side`.
    #[inline]
    pub fn best(&self, side: Side) -> Option<i32> {
        match side {
            Side::Buy => self.best_bid,
            Side::Sell => self.best_ask,
        }
    }

    #[inline]
    pub fn level(&self, side: Side, idx: i32) -> &RingLevel {
        match side {
            Side::Buy => &self.bids[idx as usize],
            Side::Sell => &self.asks[idx as usize],
        }
    }

    #[inline]
    pub fn level_mut(&mut self, side: Side, idx: i32) -> &mut RingLevel {
        match side {
            Side::Buy => &mut self.bids[idx as usize],
            Side::Sell => &mut self.asks[idx as usize],
        }
    }

    /// Adopt `idx` as the best on `side` if the add made it more aggressive.
    #[inline]
    pub fn update_best_after_add(&mut self, side: Side, idx: i32) {
        match side {
            Side::Buy => {
                if self.best_bid.map_or(true, |best| idx > best) {
                    self.best_bid = Some(idx);
                }
            }
            Side::Sell => {
                if self.best_ask.map_or(true, |best| idx < best) {
                    self.best_ask = Some(idx);
                }
            }
        }
    }

    /// Rescan for the next best after the level at `idx` emptied.
    ///
    /// No-op unless `idx` is the cached best and its level is now empty. The
    /// scan walks toward the less-aggressive direction and stops at the next
    /// non-empty level, typically the adjacent tick.
    pub fn update_best_after_remove(&mut self, side: Side, idx: i32) {
        match side {
            Side::Buy => {
                if self.best_bid != Some(idx) || !self.bids[idx as usize].is_empty() {
                    return;
                }
                self.best_bid = (0..idx).rev().find(|&i| !self.bids[i as usize].is_empty());
            }
            Side::Sell => {
                if self.best_ask != Some(idx) || !self.asks[idx as usize].is_empty() {
                    return;
                }
                self.best_ask =
                    ((idx + 1)..self.levels).find(|&i| !self.asks[i as usize].is_empty());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> Ladder {
        Ladder::new(101, 8)
    }

    #[test]
    #[should_panic(expected = "odd")]
    fn test_even_width_rejected() {
        Ladder::new(100, 8);
    }

    #[test]
    fn test_empty_ladder() {
        let book = ladder();
        assert_eq!(book.best(Side::Buy), None);
        assert_eq!(book.best(Side::Sell), None);
        assert!(book.valid_idx(0));
        assert!(book.valid_idx(100));
        assert!(!book.valid_idx(101));
        assert!(!book.valid_idx(-1));
    }

    #[test]
    fn test_best_bid_tracks_highest() {
        let mut book = ladder();
        book.level_mut(Side::Buy, 50).push(0, 10);
        book.update_best_after_add(Side::Buy, 50);
        assert_eq!(book.best(Side::Buy), Some(50));

        book.level_mut(Side::Buy, 60).push(1, 10);
        book.update_best_after_add(Side::Buy, 60);
        assert_eq!(book.best(Side::Buy), Some(60));

        // A less aggressive add leaves the cache alone
        book.level_mut(Side::Buy, 40).push(2, 10);
        book.update_best_after_add(Side::Buy, 40);
        assert_eq!(book.best(Side::Buy), Some(60));
    }

    #[test]
    fn test_best_ask_tracks_lowest() {
        let mut book = ladder();
        book.level_mut(Side::Sell, 70).push(0, 10);
        book.update_best_after_add(Side::Sell, 70);
        book.level_mut(Side::Sell, 55).push(1, 10);
        book.update_best_after_add(Side::Sell, 55);
        assert_eq!(book.best(Side::Sell), Some(55));
    }

    #[test]
    fn test_remove_rescans_to_next_level() {
        let mut book = ladder();
        for (id, idx) in [(0u32, 60), (1, 50), (2, 40)] {
            book.level_mut(Side::Buy, idx).push(id, 10);
            book.update_best_after_add(Side::Buy, idx);
        }
        assert_eq!(book.best(Side::Buy), Some(60));

        book.level_mut(Side::Buy, 60).remove(0, 10);
        book.update_best_after_remove(Side::Buy, 60);
        assert_eq!(book.best(Side::Buy), Some(50));

        book.level_mut(Side::Buy, 50).remove(1, 10);
        book.update_best_after_remove(Side::Buy, 50);
        assert_eq!(book.best(Side::Buy), Some(40));

        book.level_mut(Side::Buy, 40).remove(2, 10);
        book.update_best_after_remove(Side::Buy, 40);
        assert_eq!(book.best(Side::Buy), None);
    }

    #[test]
    fn test_remove_of_non_best_is_noop() {
        let mut book = ladder();
        book.level_mut(Side::Sell, 30).push(0, 10);
        book.update_best_after_add(Side::Sell, 30);
        book.level_mut(Side::Sell, 45).push(1, 10);
        book.update_best_after_add(Side::Sell, 45);

        book.level_mut(Side::Sell, 45).remove(1, 10);
        book.update_best_after_remove(Side::Sell, 45);
        assert_eq!(book.best(Side::Sell), Some(30));
    }

    #[test]
    fn test_remove_with_level_still_populated() {
        let mut book = ladder();
        book.level_mut(Side::Buy, 50).push(0, 10);
        book.level_mut(Side::Buy, 50).push(1, 10);
        book.update_best_after_add(Side::Buy, 50);

        book.level_mut(Side::Buy, 50).remove(0, 10);
        book.update_best_after_remove(Side::Buy, 50);
        // One order still rests at 50
        assert_eq!(book.best(Side::Buy), Some(50));
    }
}
