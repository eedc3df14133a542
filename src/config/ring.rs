//! Configuration for a [`crate::ring::HashRing`].

use std::fmt;

use crate::ring::DEFAULT_REPLICAS;

/// Configuration for a consistent-hash ring.
///
/// # Examples
///
/// ```
/// use peercache::config::RingConfig;
///
/// let config = RingConfig::default();
/// assert_eq!(config.replicas(), 20);
/// ```
#[derive(Clone, Copy)]
pub struct RingConfig {
    /// Number of virtual nodes hashed per peer.
    replicas: usize,
}

impl RingConfig {
    /// Creates a new ring configuration with the given replica count.
    pub fn new(replicas: usize) -> Self {
        Self { replicas }
    }

    /// Returns the configured number of virtual nodes per peer.
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

impl fmt::Debug for RingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingConfig")
            .field("replicas", &self.replicas)
            .finish()
    }
}

/// Lets [`crate::ring::HashRing::new`]/[`crate::ring::HashRing::with_hash`]
/// take a bare replica count wherever a `RingConfig` is expected, the same
/// way [`crate::config::GroupConfig`] accepts a bare `u64` byte budget.
impl From<usize> for RingConfig {
    fn from(replicas: usize) -> Self {
        Self::new(replicas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_replicas() {
        assert_eq!(RingConfig::default().replicas(), DEFAULT_REPLICAS);
    }

    #[test]
    fn test_custom_replicas() {
        let config = RingConfig::new(50);
        assert_eq!(config.replicas(), 50);
    }

    #[test]
    fn from_usize_matches_new() {
        let config: RingConfig = 50.into();
        assert_eq!(config.replicas(), 50);
    }
}
