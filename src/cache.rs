//! Thread-safe cache façade over [`crate::lru::Lru`].
//!
//! `Cache` wraps a single [`Lru`] behind a `parking_lot::Mutex`, lazily
//! constructing the backing store on first use so that a `Cache` built with
//! no entries yet costs nothing beyond the mutex itself. Ported from
//! `original_source/geeCache/cache.go`.

use parking_lot::Mutex;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use crate::lru::Lru;

/// A lazily initialized, mutex-guarded LRU cache of `ByteView`-like values.
///
/// `get` also takes the mutex (not a read lock) because an `Lru::get`
/// promotes the entry to most-recently-used, which mutates internal state.
pub struct Cache<K, V> {
    max_bytes: u64,
    inner: Mutex<Option<Lru<K, V>>>,
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("max_bytes", &self.max_bytes)
            .field("len", &self.len())
            .finish()
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a façade that will lazily build its backing [`Lru`] with the
    /// given byte budget on first `add`.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
        }
    }

    /// Returns a clone of the value for `key`, or `None` if absent or the
    /// store has not been initialized yet (nothing has ever been added).
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key).cloned()
    }

    /// Inserts `key`/`value`, charging `size` bytes against the budget.
    /// Initializes the backing store on first call.
    pub fn add(&self, key: K, value: V, size: u64) {
        let mut guard = self.inner.lock();
        guard
            .get_or_insert_with(|| Lru::new(self.max_bytes))
            .insert(key, value, size);
    }

    /// Returns the number of entries currently stored, `0` if uninitialized.
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::len)
    }

    /// Returns `true` if this cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
