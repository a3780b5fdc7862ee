//! Simulation driver: preload a book, replay a synthetic workload and
//! report throughput plus per-operation latency percentiles.

use hdrhistogram::Histogram;
use rust_decimal::Decimal;
use std::time::Instant;
use tickbook::{Engine, EngineConfig, OrderType, PriceMapper, Side, TimeInForce, WorkloadGen};

const PRELOAD_ORDERS: u64 = 100_000;
const WORKLOAD_OPS: u64 = 500_000;
const CANCEL_EVERY: u64 = 10_000;

fn dec(s: &str) -> Decimal {
    s.parse().expect("literal decimal")
}

fn main() {
    let config = EngineConfig {
        levels: 20_001,
        ring_capacity: 1024,
        pool_capacity: 1 << 20,
    };
    let mapper = PriceMapper::new(dec("0.01"), dec("0.00"), config.levels);
    let mut engine = Engine::new(config);

    let clock = Instant::now();
    let mut next_client_id: u64 = 1;

    // Preload resting liquidity around the middle of the ladder: bids below
    // the mid tick, asks above, spread out over 2000 ticks.
    println!("Preloading book with {PRELOAD_ORDERS} orders...");
    let mid = mapper.price_to_idx(dec("50.00"));
    let mut preload = WorkloadGen::with_defaults(42, 1..2001);
    for i in 0..PRELOAD_ORDERS {
        let offset = preload.pick(2000) as i32 + 1;
        let (side, idx) = if i % 2 == 0 {
            (Side::Buy, mid - offset)
        } else {
            (Side::Sell, mid + offset)
        };
        let qty = (i % 8) as i64 + 1;
        let ts = clock.elapsed().as_nanos() as u64;
        let client = next_client_id;
        next_client_id += 1;
        engine
            .place_limit(client, side, idx, qty, ts, TimeInForce::GoodForDay)
            .expect("preload placement");
    }
    println!(
        "Preload done: {} resting, best bid {:?}, best ask {:?}",
        engine.resting_orders(),
        engine.best_bid(),
        engine.best_ask()
    );

    // Replay the workload, timing each kernel call.
    let band = mapper.price_to_idx(dec("49.00"))..mapper.price_to_idx(dec("51.00")) + 1;
    let mut gen = WorkloadGen::with_defaults(123, band);
    let mut histogram =
        Histogram::<u64>::new_with_bounds(1, 10_000_000, 3).expect("histogram bounds");
    let mut rejected: u64 = 0;

    println!("Running {WORKLOAD_OPS} operations...");
    let run_start = Instant::now();
    for i in 0..WORKLOAD_OPS {
        let req = gen.next_request();
        let client = next_client_id;
        next_client_id += 1;
        let ts = clock.elapsed().as_nanos() as u64;

        let op_start = Instant::now();
        let result = match req.order_type {
            OrderType::Market => engine.place_market(client, req.side, req.qty, ts),
            OrderType::Limit => {
                engine.place_limit(client, req.side, req.price_idx, req.qty, ts, req.tif)
            }
        };
        let elapsed = op_start.elapsed().as_nanos() as u64;
        histogram.record(elapsed.max(1)).unwrap_or(());

        if result.is_err() {
            rejected += 1;
        }

        if i > 0 && i % CANCEL_EVERY == 0 {
            let victim = gen.pick(next_client_id) + 1;
            engine.cancel(victim);
        }
    }
    let secs = run_start.elapsed().as_secs_f64();

    println!("\n=== Simulation Report ===");
    println!("Operations: {WORKLOAD_OPS}");
    println!("Throughput: {:.0} ops/sec", WORKLOAD_OPS as f64 / secs);
    println!("Rejected:   {rejected}");
    println!("Trades:     {}", engine.trades().len());
    println!("Resting:    {}", engine.resting_orders());
    println!("-------------------------");
    println!("Latency (ns):");
    println!("  P50:    {:6}", histogram.value_at_quantile(0.50));
    println!("  P90:    {:6}", histogram.value_at_quantile(0.90));
    println!("  P99:    {:6}", histogram.value_at_quantile(0.99));
    println!("  P99.9:  {:6}", histogram.value_at_quantile(0.999));
    println!("  Max:    {:6}", histogram.max());
    println!("-------------------------");

    for (i, trade) in engine.trades().iter().take(10).enumerate() {
        println!(
            "{i}: taker={} maker={} qty={} price={}",
            trade.taker_client,
            trade.maker_client,
            trade.qty,
            mapper.idx_to_price(trade.price_idx)
        );
    }
}
