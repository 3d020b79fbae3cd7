//! Benchmarks for book side and sync engine operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

use binance_depth::orderbook::{BookSide, Side, SyncEngine};
use binance_depth::types::messages::{DepthSnapshot, DepthUpdateEvent};
use binance_depth::types::PriceLevel;

fn dec(n: i64, scale: u32) -> Decimal {
    Decimal::new(n, scale)
}

fn populated_side(levels: i64) -> BookSide {
    let mut side = BookSide::new(Side::Bid);
    for i in 0..levels {
        side.apply_level(dec(100_000 + i, 1), dec(10, 0));
    }
    side
}

fn bench_apply_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_level");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut side = populated_side(size);

            b.iter(|| {
                // Overwrite in the middle of the book
                side.apply_level(black_box(dec(100_000 + size / 2, 1)), black_box(dec(7, 0)));
            });
        });
    }

    group.finish();
}

fn bench_top_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_n");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let side = populated_side(size);

            b.iter(|| {
                black_box(side.top_n(20));
            });
        });
    }

    group.finish();
}

fn bench_event_apply(c: &mut Criterion) {
    let mut engine = SyncEngine::new("BTCUSD_PERP");
    engine.start();

    let bids: Vec<PriceLevel> = (0..500)
        .map(|i| PriceLevel::new(dec(100_000 - i, 1), dec(10, 0)))
        .collect();
    let asks: Vec<PriceLevel> = (0..500)
        .map(|i| PriceLevel::new(dec(100_001 + i, 1), dec(10, 0)))
        .collect();

    engine.on_snapshot(DepthSnapshot {
        last_update_id: 1,
        event_time: 0,
        transaction_time: 0,
        symbol: "BTCUSD_PERP".to_string(),
        pair: "BTCUSD".to_string(),
        bids,
        asks,
    });

    let mut next_id = 2u64;
    c.bench_function("event_apply", |b| {
        b.iter(|| {
            let event = DepthUpdateEvent {
                event_type: "depthUpdate".to_string(),
                event_time: 0,
                transaction_time: 0,
                symbol: "BTCUSD_PERP".to_string(),
                pair: "BTCUSD".to_string(),
                first_update_id: next_id,
                final_update_id: next_id,
                prev_final_update_id: next_id - 1,
                bids: vec![PriceLevel::new(dec(99_900, 1), dec(5, 0))],
                asks: vec![PriceLevel::new(dec(100_100, 1), dec(5, 0))],
            };
            next_id += 1;
            black_box(engine.on_event(event));
        });
    });
}

criterion_group!(benches, bench_apply_level, bench_top_n, bench_event_apply);
criterion_main!(benches);
