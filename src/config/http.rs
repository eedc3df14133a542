//! Configuration for the reference HTTP peer transport (`feature = "http"`).

use std::fmt;

/// Default path prefix for the peer HTTP protocol, matching
/// `original_source/geeCache/http.go`'s `defaultBasePath`.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";

/// Configuration for [`crate::transport::http::HttpPool`] and
/// [`crate::transport::http::HttpGetter`].
///
/// # Examples
///
/// ```
/// use peercache::config::HttpPoolConfig;
///
/// let config = HttpPoolConfig::default();
/// assert_eq!(config.base_path(), "/_peercache/");
/// ```
#[derive(Clone)]
pub struct HttpPoolConfig {
    base_path: String,
}

impl HttpPoolConfig {
    /// Creates a new HTTP pool configuration with the given path prefix.
    ///
    /// `base_path` is normalized to always start and end with `/`.
    pub fn new(base_path: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        if !base_path.starts_with('/') {
            base_path.insert(0, '/');
        }
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        Self { base_path }
    }

    /// Returns the configured path prefix.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

impl fmt::Debug for HttpPoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPoolConfig")
            .field("base_path", &self.base_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_path() {
        assert_eq!(HttpPoolConfig::default().base_path(), "/_peercache/");
    }

    #[test]
    fn test_normalizes_missing_slashes() {
        let config = HttpPoolConfig::new("cache");
        assert_eq!(config.base_path(), "/cache/");
    }
}
