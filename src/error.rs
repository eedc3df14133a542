//! Crate-wide error type.
//!
//! Only the failures a caller can act on are surfaced here. A failed peer
//! fetch and a duplicate group registration are both recoverable internally
//! (see [`crate::group`]) and never reach this type; a second call to
//! `register_peers` on the same group is a programming error and panics
//! rather than returning a `Result`.

use std::fmt;

/// Errors returned by the public cache API.
#[derive(thiserror::Error)]
pub enum Error {
    /// A key was empty where a non-empty key is required.
    #[error("key is required")]
    KeyRequired,

    /// The origin loader failed to produce a value for a key.
    #[error("loader failed: {0}")]
    Loader(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyRequired => f.write_str("Error::KeyRequired"),
            Error::Loader(source) => write!(f, "Error::Loader({source})"),
        }
    }
}

impl Error {
    /// Wraps any boxable error as a loader failure.
    pub fn loader<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Loader(Box::new(source))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct LoaderFailureMessage(String);

impl Clone for Error {
    // `Box<dyn Error>` has no blanket `Clone`. Cloning is needed so the
    // single-flight coalescer (crate::singleflight) can replay one loader
    // result to every waiter; the clone preserves the displayed message but
    // not the original source's concrete type or downcast chain.
    fn clone(&self) -> Self {
        match self {
            Error::KeyRequired => Error::KeyRequired,
            Error::Loader(source) => Error::loader(LoaderFailureMessage(source.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("origin unreachable")]
    struct OriginUnreachable;

    #[test]
    fn key_required_message() {
        assert_eq!(Error::KeyRequired.to_string(), "key is required");
    }

    #[test]
    fn loader_wraps_and_displays_source() {
        let err = Error::loader(OriginUnreachable);
        assert_eq!(err.to_string(), "loader failed: origin unreachable");
    }
}
