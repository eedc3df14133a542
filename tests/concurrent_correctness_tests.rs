//! Concurrency correctness tests driven across real OS threads, covering
//! the invariants spec.md §5 and §8 hold the core to: the façade's mutex
//! must serialize `get`/`add` so promotions and evictions stay consistent,
//! and the ring must be safe to read from many threads once built.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use peercache::cache::Cache;
use peercache::ring::HashRing;

#[test]
fn cache_facade_serializes_concurrent_add_and_get() {
    let cache: Arc<Cache<String, String>> = Arc::new(Cache::new(0)); // unbounded
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..200 {
                    let key = format!("t{t}-k{i}");
                    cache.add(key.clone(), format!("v{i}"), 1);
                    assert_eq!(cache.get(&key), Some(format!("v{i}")));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cache.len(), 8 * 200);
}

#[test]
fn cache_facade_byte_budget_holds_under_concurrent_writers() {
    // Budget of 100 bytes, 1-byte entries: `used_bytes` must never be
    // observed >= 100 from outside a write, since the façade's mutex is
    // held across the whole add+evict sequence.
    let cache: Arc<Cache<u64, u8>> = Arc::new(Cache::new(100));
    let barrier = Arc::new(Barrier::new(10));
    let violations = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            let violations = violations.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..500u64 {
                    let key = t as u64 * 1000 + i;
                    cache.add(key, 0, 1);
                    if cache.len() > 100 {
                        violations.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(violations.load(Ordering::SeqCst), 0);
    assert!(cache.len() <= 100);
}

#[test]
fn ring_reads_are_safe_from_many_threads_once_built() {
    let mut ring = HashRing::new(20usize);
    ring.add(&["peer-a", "peer-b", "peer-c", "peer-d"]);
    let ring = Arc::new(ring);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ring = ring.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let mut owners = Vec::with_capacity(100);
                for i in 0..100 {
                    owners.push(ring.get(&format!("key-{t}-{i}")).unwrap().to_string());
                }
                // Same thread, same keys, same ring: must be stable.
                for i in 0..100 {
                    assert_eq!(ring.get(&format!("key-{t}-{i}")).unwrap(), owners[i]);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
