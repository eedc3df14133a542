//! Byte-budgeted least-recently-used cache.
//!
//! `Lru` evicts the least recently used entry whenever the sum of its
//! entries' sizes reaches the configured byte budget. It provides O(1)
//! `get`/`insert`/`remove` using a hash map of raw pointers into the
//! [`crate::list`] doubly linked list.
//!
//! # Size accounting
//!
//! `Lru` does not compute sizes itself — callers pass the size to charge
//! against the budget on each `insert` (typically `key.len() +
//! value.len()`, as [`crate::cache::Cache`] does). A `max_bytes` of `0`
//! disables the budget entirely: nothing is ever evicted.
//!
//! # Examples
//!
//! ```
//! use peercache::lru::Lru;
//!
//! let mut cache: Lru<String, String> = Lru::new(20);
//! cache.insert("a".to_string(), "1".to_string(), 2);
//! cache.insert("b".to_string(), "22".to_string(), 3);
//! assert_eq!(cache.get(&"a".to_string()), Some(&"1".to_string()));
//! ```

use crate::entry::CacheEntry;
use crate::list::{Entry, List};

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A least-recently-used cache bounded by total byte size rather than entry
/// count.
///
/// `S` is the hasher builder for the backing index, defaulting to
/// `hashbrown`'s [`DefaultHashBuilder`] when the `hashbrown` feature is
/// enabled (the default), or [`std::collections::hash_map::RandomState`]
/// otherwise.
pub struct Lru<K, V, S = DefaultHashBuilder> {
    map: HashMap<K, *mut Entry<CacheEntry<K, V>>, S>,
    list: List<CacheEntry<K, V>>,
    max_bytes: u64,
    used_bytes: u64,
    on_evicted: Option<Box<dyn FnMut(&K, &V) + Send>>,
}

// `List` owns the entries it stores (raw pointers are only ever read back
// through `map`, which this type also owns), so `Lru` is Send/Sync exactly
// when its contents are.
unsafe impl<K: Send, V: Send, S: Send> Send for Lru<K, V, S> {}
unsafe impl<K: Sync, V: Sync, S: Sync> Sync for Lru<K, V, S> {}

impl<K: Hash + Eq, V> Lru<K, V> {
    /// Creates a cache with the given byte budget and a default hasher.
    ///
    /// A `max_bytes` of `0` means unbounded — `insert` never evicts.
    pub fn new(max_bytes: u64) -> Self {
        Self::with_hasher(max_bytes, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Lru<K, V, S> {
    /// Creates a cache with the given byte budget and hasher builder.
    pub fn with_hasher(max_bytes: u64, hash_builder: S) -> Self {
        Self {
            map: HashMap::with_hasher(hash_builder),
            // The list itself is not the thing that bounds this cache — the
            // byte budget is. Its capacity exists only so the underlying
            // container never has to reallocate or refuse an `add`.
            list: List::new(NonZeroUsize::new(usize::MAX).unwrap()),
            max_bytes,
            used_bytes: 0,
            on_evicted: None,
        }
    }

    /// Installs a callback invoked with `(key, value)` for every entry this
    /// cache evicts on its own (not for entries removed via [`Lru::remove`]
    /// or [`Lru::clear`]).
    pub fn set_on_evicted<F>(&mut self, f: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(f));
    }

    /// Returns the configured byte budget. `0` means unbounded.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Returns the sum of sizes of all entries currently stored.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Returns the number of entries currently stored.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if this cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns a reference to the value for `key`, promoting it to
    /// most-recently-used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.map.get(key)?;
        // SAFETY: `node` came from `self.map` and is only invalidated by
        // `remove`/`clear`, both of which also remove it from `self.map`.
        unsafe {
            self.list.move_to_front(node);
            Some(&(*node).get_value().value)
        }
    }

    /// Returns a mutable reference to the value for `key`, promoting it to
    /// most-recently-used.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.map.get(key)?;
        // SAFETY: see `get`.
        unsafe {
            self.list.move_to_front(node);
            Some(&mut (*node).get_value_mut().value)
        }
    }

    /// Returns `true` if `key` is present, without affecting recency order.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts `key`/`value`, charging `size` bytes against the budget, and
    /// evicts least-recently-used entries until usage is back under budget.
    ///
    /// If `key` was already present, its value and size are replaced and it
    /// is promoted to most-recently-used; the entry's contribution to
    /// `used_bytes` is recomputed from the new size, not added to the old
    /// one.
    pub fn insert(&mut self, key: K, value: V, size: u64)
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: `node` is a live, non-sigil entry owned by `self.list`.
            unsafe {
                let old_size = (*node).get_value().size;
                let (_, _) = self
                    .list
                    .update(node, CacheEntry::new(key, value, size), false);
                self.used_bytes = self.used_bytes - old_size + size;
                self.list.move_to_front(node);
            }
        } else {
            let node = self
                .list
                .add_unchecked(CacheEntry::new(key.clone(), value, size));
            self.map.insert(key, node);
            self.used_bytes += size;
        }
        self.evict_over_budget();
    }

    /// Removes `key`, returning its value if present. Does not invoke the
    /// `on_evicted` callback — that callback fires only for entries this
    /// cache evicts on its own.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = self.map.remove(key)?;
        // SAFETY: `node` came from `self.map`, which we just removed it
        // from, so no other reference to it can observe this list op.
        let boxed = unsafe { self.list.remove(node) }?;
        let entry = unsafe { boxed.into_value() };
        self.used_bytes -= entry.size;
        Some(entry.value)
    }

    /// Removes all entries without invoking the `on_evicted` callback.
    pub fn clear(&mut self) {
        self.list.clear();
        self.map.clear();
        self.used_bytes = 0;
    }

    fn evict_over_budget(&mut self) {
        if self.max_bytes == 0 {
            return;
        }
        while self.used_bytes >= self.max_bytes {
            let Some(boxed) = self.list.remove_last() else {
                break;
            };
            let entry = unsafe { boxed.into_value() };
            self.used_bytes -= entry.size;
            self.map.remove(&entry.key);
            if let Some(cb) = self.on_evicted.as_mut() {
                cb(&entry.key, &entry.value);
            }
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, S> std::fmt::Debug for Lru<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lru")
            .field("len", &self.map.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_promotes_to_front_and_put_evicts_lru() {
        let mut cache: Lru<&str, i32> = Lru::new(3);
        cache.insert("a", 1, 1);
        cache.insert("b", 2, 1);
        cache.insert("c", 3, 1);
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("d", 4, 1);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.get(&"d"), Some(&4));
    }

    #[test]
    fn zero_max_bytes_never_evicts() {
        let mut cache: Lru<i32, i32> = Lru::new(0);
        for i in 0..1000 {
            cache.insert(i, i, 1);
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.used_bytes(), 1000);
    }

    #[test]
    fn insert_overwrite_recomputes_size_not_additive() {
        let mut cache: Lru<&str, Vec<u8>> = Lru::new(100);
        cache.insert("k", vec![0; 10], 10);
        assert_eq!(cache.used_bytes(), 10);
        cache.insert("k", vec![0; 40], 40);
        assert_eq!(cache.used_bytes(), 40);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_does_not_invoke_on_evicted() {
        let mut cache: Lru<&str, i32> = Lru::new(100);
        let evicted = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let evicted_clone = evicted.clone();
        cache.set_on_evicted(move |k, v| evicted_clone.lock().unwrap().push((*k, *v)));
        cache.insert("a", 1, 1);
        cache.remove(&"a");
        assert!(evicted.lock().unwrap().is_empty());
    }

    #[test]
    fn on_evicted_fires_for_capacity_eviction() {
        let mut cache: Lru<&str, i32> = Lru::new(2);
        let evicted = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let evicted_clone = evicted.clone();
        cache.set_on_evicted(move |k, v| evicted_clone.lock().unwrap().push((*k, *v)));
        cache.insert("a", 1, 1);
        cache.insert("b", 2, 1);
        assert_eq!(*evicted.lock().unwrap(), vec![("a", 1)]);
    }

    #[test]
    fn eviction_threshold_is_inclusive() {
        // Budget exactly met (`>=`, not `>`) still triggers eviction.
        let mut cache: Lru<&str, i32> = Lru::new(2);
        cache.insert("a", 1, 2);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.used_bytes(), 0);
    }

    #[test]
    fn get_mut_allows_in_place_update() {
        let mut cache: Lru<&str, i32> = Lru::new(100);
        cache.insert("a", 1, 1);
        *cache.get_mut(&"a").unwrap() = 42;
        assert_eq!(cache.get(&"a"), Some(&42));
    }

    #[test]
    fn contains_key_does_not_affect_order() {
        let mut cache: Lru<&str, i32> = Lru::new(2);
        cache.insert("a", 1, 1);
        cache.insert("b", 2, 1);
        assert!(cache.contains_key(&"a"));
        cache.insert("c", 3, 1);
        // "a" was not promoted by contains_key, so it's still LRU and evicted.
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn clear_resets_state() {
        let mut cache: Lru<&str, i32> = Lru::new(100);
        cache.insert("a", 1, 1);
        cache.insert("b", 2, 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.used_bytes(), 0);
        assert_eq!(cache.get(&"a"), None);
    }
}
