//! Request coalescing.
//!
//! [`Group::do_call`] ensures that at most one execution of a given key's
//! function runs at a time — concurrent callers for the same key block on
//! the in-flight call instead of duplicating the work, and all of them
//! observe the same result. Ported from
//! `original_source/geeCache/singleflight/singleflight.go`; Go's
//! `sync.WaitGroup` completion signal becomes a `parking_lot::Condvar` here,
//! since there is no direct `WaitGroup` equivalent in the standard library.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::Error;

struct Call<V> {
    done: Mutex<Option<Result<V, Error>>>,
    condvar: Condvar,
}

impl<V> Call<V> {
    fn new() -> Self {
        Self {
            done: Mutex::new(None),
            condvar: Condvar::new(),
        }
    }
}

/// Coalesces concurrent calls for the same key into a single execution.
pub struct Group<K, V> {
    calls: Mutex<HashMap<K, Arc<Call<V>>>>,
}

impl<K, V> fmt::Debug for Group<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

impl<K, V> Default for Group<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> Group<K, V> {
    /// Creates an empty coalescing group.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` for `key`, or waits for and returns the result of an
    /// already in-flight call for the same key.
    ///
    /// Exactly one call to `f` runs per key at a time; every caller that
    /// arrives while it is running — including this one, had it arrived
    /// later — observes the same `Result`.
    pub fn do_call<F>(&self, key: K, f: F) -> Result<V, Error>
    where
        F: FnOnce() -> Result<V, Error>,
    {
        let call = {
            let mut calls = self.calls.lock();
            if let Some(existing) = calls.get(&key) {
                let existing = existing.clone();
                drop(calls);
                return Self::wait(&existing);
            }
            let call = Arc::new(Call::new());
            calls.insert(key.clone(), call.clone());
            call
        };

        let result = f();

        {
            let mut done = call.done.lock();
            *done = Some(result.clone());
            call.condvar.notify_all();
        }

        self.calls.lock().remove(&key);
        result
    }

    fn wait(call: &Arc<Call<V>>) -> Result<V, Error> {
        let mut done = call.done.lock();
        while done.is_none() {
            call.condvar.wait(&mut done);
        }
        done.as_ref().unwrap().clone()
    }
}
