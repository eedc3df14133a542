//! Higher-volume concurrency stress tests. These exist to catch the kind
//! of corruption low thread/iteration counts tend to miss: lost updates,
//! double evictions, or a coalescer record outliving its waiters.

extern crate scoped_threadpool;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scoped_threadpool::Pool;

use peercache::cache::Cache;
use peercache::group::Group;
use peercache::singleflight;

const NUM_THREADS: u32 = 16;
const OPS_PER_THREAD: usize = 2_000;

#[test]
fn cache_facade_survives_high_contention_without_losing_invariants() {
    let cache: Cache<u64, u64> = Cache::new(4096);
    let mut pool = Pool::new(NUM_THREADS);

    // `scoped_threadpool::Pool::scoped` lets every worker borrow `cache`
    // directly instead of wrapping it in an `Arc` purely to satisfy a
    // `'static` bound none of these threads actually need.
    pool.scoped(|scope| {
        for t in 0..NUM_THREADS {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = t as u64 * OPS_PER_THREAD as u64 + i as u64;
                    cache.add(key, key, 1);
                    let _ = cache.get(&key);
                }
            });
        }
    });

    // Budget of 4096 1-byte entries, `>=` eviction: len settles just under it.
    assert!(cache.len() < 4096);
}

#[test]
fn singleflight_coalesces_under_sustained_concurrent_bursts() {
    let group: Arc<singleflight::Group<String, usize>> = Arc::new(singleflight::Group::new());
    let mut pool = Pool::new(NUM_THREADS);
    let total_calls = AtomicUsize::new(0);

    pool.scoped(|scope| {
        for _ in 0..NUM_THREADS {
            let group = group.clone();
            let total_calls = &total_calls;
            scope.execute(move || {
                for round in 0..50 {
                    let key = format!("round-{round}");
                    let result = group.do_call(key, || {
                        total_calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_micros(200));
                        Ok(round)
                    });
                    assert_eq!(result.unwrap(), round);
                }
            });
        }
    });

    // Rounds are sequential per thread but interleaved across threads, so
    // more than one call per round is possible (threads land on the same
    // round at different moments). The invariant this test actually checks
    // is the one singleflight guarantees unconditionally: every caller that
    // did arrive while a round's call was in flight got that exact result,
    // which the per-call `assert_eq!` above already verifies. Total calls
    // must still never exceed one per (thread, round) pair.
    assert!(total_calls.load(Ordering::SeqCst) <= NUM_THREADS as usize * 50);
}

#[test]
fn group_get_under_sustained_concurrent_load_calls_origin_once_per_key() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let group = Arc::new(Group::new("stress", 1u64 << 20, move |key: &str| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_micros(500));
        Ok(key.as_bytes().to_vec())
    }));

    let mut pool = Pool::new(NUM_THREADS);
    pool.scoped(|scope| {
        for _ in 0..NUM_THREADS {
            let group = group.clone();
            scope.execute(move || {
                for i in 0..20 {
                    let key = format!("shared-key-{}", i % 5);
                    group.get(&key).unwrap();
                }
            });
        }
    });

    // Only 5 distinct keys were ever requested, so the origin loader must
    // have run at most 5 times total across every thread.
    assert!(calls.load(Ordering::SeqCst) <= 5);
}
