// Simple benchmarks using criterion instead of unstable test feature
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use peercache::byteview::ByteView;
use peercache::cache::Cache;

// Benchmark configuration
const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;

fn bench_cache_facade(c: &mut Criterion) {
    let cache: Cache<usize, ByteView> = Cache::new(0); // unbounded
    for i in 0..CACHE_SIZE {
        cache.add(i, ByteView::from(i.to_string()), 8);
    }

    c.bench_function("Cache facade get hit", |b| {
        b.iter(|| {
            for i in 0..NUM_OPERATIONS {
                black_box(cache.get(&(i % CACHE_SIZE)));
            }
        });
    });

    c.bench_function("Cache facade add", |b| {
        let mut i = CACHE_SIZE;
        b.iter(|| {
            cache.add(i, ByteView::from(i.to_string()), 8);
            i += 1;
        });
    });
}

fn bench_byteview(c: &mut Criterion) {
    let small = ByteView::new(b"value-for-key");
    let large = ByteView::new(&vec![0u8; 64 * 1024]);

    c.bench_function("ByteView clone (small)", |b| {
        b.iter(|| black_box(small.clone()));
    });

    c.bench_function("ByteView clone (64KiB)", |b| {
        b.iter(|| black_box(large.clone()));
    });

    c.bench_function("ByteView to_vec (64KiB, defensive copy)", |b| {
        b.iter(|| black_box(large.to_vec()));
    });
}

criterion_group!(benches, bench_cache_facade, bench_byteview);
criterion_main!(benches);
