use super::populated_book;
use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;

/// Register benchmarks for cancellation and market-data reads.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Cancel & Depth");

    for &levels in &[10, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("cancel_every_order", levels),
            &levels,
            |b, &levels| {
                b.iter_with_setup(
                    || populated_book(levels, 2),
                    |book| {
                        for level in 0..levels {
                            for n in 0..2 {
                                black_box(book.cancel_order(&format!("b{level}-{n}")));
                                black_box(book.cancel_order(&format!("a{level}-{n}")));
                            }
                        }
                        assert_eq!(book.order_count(), 0);
                    },
                );
            },
        );
    }

    for &levels in &[10, 100, 1_000] {
        let book = populated_book(levels, 2);
        group.bench_with_input(BenchmarkId::new("depth_10", levels), &levels, |b, _| {
            b.iter(|| black_box(book.depth(10)));
        });
        group.bench_with_input(BenchmarkId::new("best_bid_ask", levels), &levels, |b, _| {
            b.iter(|| black_box(book.best_bid_ask()));
        });
    }

    group.finish();
}
