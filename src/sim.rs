//! Synthetic workload generation for simulation and benchmarking.
//!
//! Produces a deterministic, seeded stream of order requests with a
//! realistic mix: mostly good-for-day limits around a configurable tick
//! band, a few percent market orders, the occasional immediate-or-cancel.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

use crate::types::{OrderType, Side, TimeInForce};

/// One generated order request, ready to feed the kernel.
#[derive(Clone, Copy, Debug)]
pub struct OrderRequest {
    pub order_type: OrderType,
    pub side: Side,
    /// Tick index; meaningless for market orders
    pub price_idx: i32,
    pub qty: i64,
    pub tif: TimeInForce,
}

/// Seeded request generator over a tick band.
pub struct WorkloadGen {
    rng: ChaCha8Rng,
    band: Range<i32>,
    max_qty: i64,
    market_prob: f64,
    ioc_prob: f64,
}

impl WorkloadGen {
    /// Generator drawing limit prices uniformly from `band`, quantities
    /// from `1..=max_qty`, with the given market-order and IOC
    /// probabilities. The same seed always yields the same stream.
    pub fn new(seed: u64, band: Range<i32>, max_qty: i64, market_prob: f64, ioc_prob: f64) -> Self {
        assert!(!band.is_empty(), "price band must be non-empty");
        assert!(max_qty > 0, "max quantity must be positive");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            band,
            max_qty,
            market_prob,
            ioc_prob,
        }
    }

    /// The original demo mix: ~3% market orders, 0.5% IOC, qty 1..=100.
    pub fn with_defaults(seed: u64, band: Range<i32>) -> Self {
        Self::new(seed, band, 100, 0.03, 0.005)
    }

    /// Draw the next request.
    pub fn next_request(&mut self) -> OrderRequest {
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let qty = self.rng.gen_range(1..=self.max_qty);

        if self.rng.gen_bool(self.market_prob) {
            return OrderRequest {
                order_type: OrderType::Market,
                side,
                price_idx: -1,
                qty,
                tif: TimeInForce::ImmediateOrCancel,
            };
        }

        let price_idx = self.rng.gen_range(self.band.clone());
        let tif = if self.rng.gen_bool(self.ioc_prob) {
            TimeInForce::ImmediateOrCancel
        } else {
            TimeInForce::GoodForDay
        };
        OrderRequest {
            order_type: OrderType::Limit,
            side,
            price_idx,
            qty,
            tif,
        }
    }

    /// Uniform draw from `0..bound`, for driver-side choices such as which
    /// client to cancel.
    pub fn pick(&mut self, bound: u64) -> u64 {
        self.rng.gen_range(0..bound)
    }
}
