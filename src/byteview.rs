//! Immutable byte-sequence values.
//!
//! [`ByteView`] is the unit of value the whole cache stores, moves across
//! peers, and hands back to callers. It is backed by an `Arc<[u8]>` so that
//! cloning a `ByteView` (promoting it in the LRU, handing it to a waiting
//! single-flight caller, returning it from `Group::get`) never copies the
//! underlying bytes — only at the trust boundaries named in the data model
//! (ingress from a loader or peer, egress as a `Vec<u8>`/`&str`) does a real
//! copy happen, which is exactly where the original Go implementation's
//! `cloneBytes` calls sit.

use std::fmt;
use std::sync::Arc;

/// An immutable view over a byte sequence.
///
/// `ByteView` never exposes a mutable handle to its storage. Reading it out
/// as owned bytes (`to_vec`) or as a string (`as_str`) always produces a
/// fresh copy, so nothing a caller does to the result can alias or corrupt
/// what the cache holds internally.
#[derive(Clone, Eq)]
pub struct ByteView {
    data: Arc<[u8]>,
}

impl ByteView {
    /// Creates a `ByteView` by copying `bytes`.
    ///
    /// Use this at the boundary where bytes first enter the cache (an
    /// origin loader's return value, a peer response body).
    pub fn new(bytes: &[u8]) -> Self {
        ByteView {
            data: Arc::from(bytes),
        }
    }

    /// Creates a `ByteView` by taking ownership of `bytes` without copying.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        ByteView {
            data: Arc::from(bytes.into_boxed_slice()),
        }
    }

    /// Returns the number of bytes in this view.
    ///
    /// This is the quantity the LRU store's byte budget counts.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this view holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a defensive copy of the underlying bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Returns the underlying bytes as a UTF-8 string, copying them.
    ///
    /// Invalid UTF-8 is replaced per [`String::from_utf8_lossy`].
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Returns a borrowed slice of the underlying bytes without copying.
    ///
    /// Callers must not assume the returned slice can be mutated in place —
    /// it borrows shared storage that may be aliased by other `ByteView`
    /// clones.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq for ByteView {
    fn eq(&self, other: &Self) -> bool {
        self.data.as_ref() == other.data.as_ref()
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        ByteView::new(s.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        ByteView::from_vec(s.into_bytes())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        ByteView::from_vec(bytes)
    }
}
