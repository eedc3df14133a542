//! Traits a [`crate::group::Group`] uses to load data it does not hold
//! locally: an origin loader for cache misses, and a peer picker/getter
//! pair for forwarding a key to whichever peer owns it. Ported from
//! `original_source/geeCache/geecache.go`'s `Getter`/`GetterFunc` and
//! `original_source/geeCache/peers.go`.

use std::sync::Arc;

use crate::error::Error;

/// Loads a value from the system of record when a key is not cached
/// anywhere in the group.
pub trait Getter: Send + Sync {
    /// Fetches the bytes for `key` from the origin.
    fn get(&self, key: &str) -> Result<Vec<u8>, Error>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> Result<Vec<u8>, Error> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        self(key)
    }
}

/// Chooses which peer, if any, owns a given key.
///
/// Implementations typically wrap a [`crate::ring::HashRing`] and exclude
/// the local peer from the returned candidates, so that a cache miss for a
/// key this process owns always falls through to [`Getter`] instead of
/// calling itself over the network.
pub trait PeerPicker: Send + Sync {
    /// Returns the peer that owns `key`, or `None` if the local process
    /// should handle it (either because it owns the key, or because no
    /// peers have been registered).
    ///
    /// Returns an owned `Arc` rather than a borrow: implementations
    /// typically hold their peer table behind a lock (see
    /// `crate::transport::http::HttpPool`), and a borrow tied to that
    /// lock's guard could not outlive this call.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a key's value for a given group from a remote peer.
pub trait PeerGetter: Send + Sync {
    /// Fetches `key` within `group` from this peer.
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, Error>;
}
