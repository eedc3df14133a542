//! Configuration for a [`crate::group::Group`].

use std::fmt;

/// Configuration for a cache group.
///
/// # Examples
///
/// ```
/// use peercache::config::GroupConfig;
///
/// let config = GroupConfig::new(64 << 20);
/// assert_eq!(config.cache_bytes(), 64 << 20);
/// ```
#[derive(Clone, Copy)]
pub struct GroupConfig {
    /// Byte budget for the group's local cache. `0` means unbounded.
    cache_bytes: u64,
}

impl GroupConfig {
    /// Creates a new group configuration with the given local cache budget.
    pub fn new(cache_bytes: u64) -> Self {
        Self { cache_bytes }
    }

    /// Returns the configured local cache byte budget.
    pub fn cache_bytes(&self) -> u64 {
        self.cache_bytes
    }
}

impl fmt::Debug for GroupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupConfig")
            .field("cache_bytes", &self.cache_bytes)
            .finish()
    }
}

/// Lets [`crate::group::Group::new`] take a bare byte budget (`0` meaning
/// unbounded) wherever a `GroupConfig` is expected, so a plain `u64` is
/// still the common case at the call site while the byte budget passes
/// through real config plumbing rather than a second, parallel parameter.
impl From<u64> for GroupConfig {
    fn from(cache_bytes: u64) -> Self {
        Self::new(cache_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_config_creation() {
        let config = GroupConfig::new(1024);
        assert_eq!(config.cache_bytes(), 1024);
    }

    #[test]
    fn from_u64_matches_new() {
        let config: GroupConfig = 1024.into();
        assert_eq!(config.cache_bytes(), 1024);
    }
}
