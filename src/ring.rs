//! Consistent-hash peer ring.
//!
//! [`HashRing`] maps keys to peers with virtual nodes (replicas), so that
//! adding or removing a peer only reshuffles a fraction of the keyspace
//! instead of all of it. Ported from
//! `original_source/geeCache/consistenthash/consistenthash.go`: peers are
//! hashed `replicas` times each as `itoa(i) || peer` — index first, peer
//! string second — and a key's owner is the peer whose virtual node hash is
//! the smallest one `>=` the key's hash, wrapping around to the first
//! virtual node if the key hashes past the last one.

use std::collections::HashMap;
use std::fmt;

use crate::config::RingConfig;

/// A hash function over raw bytes, producing a 32-bit digest.
///
/// The default, [`Crc32Hasher`], is IEEE CRC-32 — the same polynomial as
/// Go's `crc32.ChecksumIEEE`, so a Go and a Rust deployment hashing the same
/// key set place keys on numerically identical ring positions.
pub trait RingHash {
    /// Hashes `bytes` to a 32-bit digest.
    fn hash(&self, bytes: &[u8]) -> u32;
}

/// IEEE CRC-32, matching Go's `crc32.ChecksumIEEE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Hasher;

impl RingHash for Crc32Hasher {
    fn hash(&self, bytes: &[u8]) -> u32 {
        crc32fast::hash(bytes)
    }
}

/// Default number of virtual nodes hashed per peer.
pub const DEFAULT_REPLICAS: usize = 20;

/// A consistent-hash ring over a set of peer identifiers.
///
/// `H` is the hash function, defaulting to [`Crc32Hasher`].
pub struct HashRing<H = Crc32Hasher> {
    replicas: usize,
    hash: H,
    /// Virtual node positions, kept sorted for binary search.
    positions: Vec<u32>,
    /// Virtual node position → owning peer.
    owners: HashMap<u32, String>,
}

impl HashRing<Crc32Hasher> {
    /// Creates an empty ring with the configured virtual nodes per peer and
    /// the default CRC-32 hash.
    ///
    /// `config` accepts either a [`RingConfig`] or a bare `usize` replica
    /// count via [`RingConfig`]'s `From<usize>` impl.
    pub fn new(config: impl Into<RingConfig>) -> Self {
        Self::with_hash(config, Crc32Hasher)
    }
}

impl Default for HashRing<Crc32Hasher> {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

impl<H: RingHash> HashRing<H> {
    /// Creates an empty ring with the configured virtual nodes per peer and
    /// a custom hash function.
    pub fn with_hash(config: impl Into<RingConfig>, hash: H) -> Self {
        Self {
            replicas: config.into().replicas(),
            hash,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Returns `true` if no peers have been added yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Adds peers to the ring, hashing each `replicas` times.
    ///
    /// Calling this again with peers already on the ring adds duplicate
    /// virtual nodes for them; callers should add each peer once.
    pub fn add(&mut self, peers: &[impl AsRef<str>]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let virtual_key = format!("{i}{peer}");
                let position = self.hash.hash(virtual_key.as_bytes());
                self.positions.push(position);
                self.owners.insert(position, peer.to_string());
            }
        }
        self.positions.sort_unstable();
    }

    /// Returns the peer responsible for `key`, or `None` if the ring has no
    /// peers.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = self.hash.hash(key.as_bytes());
        let idx = self.positions.partition_point(|&p| p < hash);
        let idx = idx % self.positions.len();
        self.owners.get(&self.positions[idx]).map(String::as_str)
    }
}

impl<H> fmt::Debug for HashRing<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("peers", &self.owners.len() / self.replicas.max(1))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;

    #[test]
    fn empty_ring_returns_none() {
        let ring = HashRing::default();
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn same_key_always_maps_to_same_peer() {
        let mut ring = HashRing::new(20usize);
        ring.add(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        let first = ring.get("user:42").unwrap().to_string();
        for _ in 0..50 {
            assert_eq!(ring.get("user:42").unwrap(), first);
        }
    }

    #[test]
    fn distribution_is_reasonably_balanced() {
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        let peers = ["p1", "p2", "p3"];
        ring.add(&peers);

        let mut counts: StdHashMap<&str, usize> = StdHashMap::new();
        for i in 0..10_000 {
            let key = format!("key-{i}");
            let owner = ring.get(&key).unwrap();
            *counts.entry(owner).or_insert(0) += 1;
        }

        for peer in peers {
            let count = counts.get(peer).copied().unwrap_or(0);
            let fraction = count as f64 / 10_000.0;
            assert!(
                (0.20..=0.47).contains(&fraction),
                "peer {peer} got {fraction} of keys"
            );
        }
    }

    #[test]
    fn single_peer_gets_all_keys() {
        let mut ring = HashRing::new(20usize);
        ring.add(&["only"]);
        for i in 0..100 {
            assert_eq!(ring.get(&format!("k{i}")), Some("only"));
        }
    }

    #[test]
    fn wraps_around_past_the_last_virtual_node() {
        // A ring with one peer and one replica has exactly one virtual node;
        // every key must wrap to it regardless of hash ordering.
        let mut ring = HashRing::new(1usize);
        ring.add(&["solo"]);
        assert_eq!(ring.get("zzzzzzzzzzzzzzzzzzzz"), Some("solo"));
        assert_eq!(ring.get(""), Some("solo"));
    }
}
