//! Price mapping - real prices to tick indices and back.
//!
//! The kernel itself only ever sees integral tick indices; this is the
//! boundary where decimal venue prices become ladder positions. Arithmetic
//! is fixed-point throughout so no float rounding leaks into the mapping.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Maps prices on a fixed tick grid: price = min_price + idx * tick.
#[derive(Clone, Copy, Debug)]
pub struct PriceMapper {
    tick: Decimal,
    min_price: Decimal,
    levels: i32,
}

impl PriceMapper {
    /// # Panics
    /// Panics unless `tick` is positive and `levels` is positive.
    pub fn new(tick: Decimal, min_price: Decimal, levels: i32) -> Self {
        assert!(tick > Decimal::ZERO, "tick must be positive");
        assert!(levels > 0, "ladder must have at least one level");
        Self {
            tick,
            min_price,
            levels,
        }
    }

    /// Nearest tick index for `price`, clamped into `[0, levels)`.
    pub fn price_to_idx(&self, price: Decimal) -> i32 {
        let raw = ((price - self.min_price) / self.tick).round();
        let idx = raw.to_i32().unwrap_or(if raw.is_sign_negative() {
            0
        } else {
            self.levels - 1
        });
        idx.clamp(0, self.levels - 1)
    }

    /// Price at tick `idx`.
    pub fn idx_to_price(&self, idx: i32) -> Decimal {
        self.min_price + Decimal::from(idx) * self.tick
    }

    /// Ladder width this mapper was sized for.
    #[inline]
    pub fn levels(&self) -> i32 {
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn mapper() -> PriceMapper {
        // Penny ticks from 0.00, ladder 20001 wide (mid at 100.00)
        PriceMapper::new(dec("0.01"), dec("0.00"), 20_001)
    }

    #[test]
    fn test_exact_grid_points() {
        let pm = mapper();
        assert_eq!(pm.price_to_idx(dec("0.00")), 0);
        assert_eq!(pm.price_to_idx(dec("50.00")), 5000);
        assert_eq!(pm.price_to_idx(dec("200.00")), 20_000);
    }

    #[test]
    fn test_rounds_to_nearest_tick() {
        let pm = mapper();
        assert_eq!(pm.price_to_idx(dec("49.996")), 5000);
        assert_eq!(pm.price_to_idx(dec("50.004")), 5000);
        assert_eq!(pm.price_to_idx(dec("50.011")), 5001);
    }

    #[test]
    fn test_clamps_out_of_band() {
        let pm = mapper();
        assert_eq!(pm.price_to_idx(dec("-3.00")), 0);
        assert_eq!(pm.price_to_idx(dec("999999.00")), 20_000);
    }

    #[test]
    fn test_idx_to_price_roundtrip() {
        let pm = mapper();
        for idx in [0, 1, 5000, 20_000] {
            let price = pm.idx_to_price(idx);
            assert_eq!(pm.price_to_idx(price), idx);
        }
        assert_eq!(pm.idx_to_price(5000), dec("50.00"));
    }

    #[test]
    fn test_offset_grid() {
        let pm = PriceMapper::new(dec("0.25"), dec("10.00"), 101);
        assert_eq!(pm.price_to_idx(dec("10.00")), 0);
        assert_eq!(pm.price_to_idx(dec("12.50")), 10);
        assert_eq!(pm.idx_to_price(10), dec("12.50"));
    }
}
