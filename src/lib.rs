#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Data flow
//!
//! ```text
//! Group::get(key)
//!   │
//!   ├─ local cache hit ───────────────────────────────▶ return
//!   │
//!   └─ miss ─▶ singleflight::Group::do_call(key, ...)
//!               │
//!               ├─ peer picker routes key to a remote peer
//!               │    ├─ peer fetch OK  ─▶ return (no local insert)
//!               │    └─ peer fetch err ─▶ fall through
//!               │
//!               └─ origin loader ─▶ populate local cache ─▶ return
//! ```
//!
//! # Modules
//!
//! - [`byteview`]: the immutable, defensively-copied value type the cache
//!   stores and hands back.
//! - [`entry`]: the key/value/size triple stored in the LRU's backing list.
//! - [`list`]: internal doubly linked list giving the LRU O(1) MRU/LRU
//!   reordering. Not exposed outside the crate.
//! - [`lru`]: the byte-budgeted LRU store itself.
//! - [`cache`]: a mutex-guarded façade over [`lru::Lru`], lazily
//!   initialized on first write.
//! - [`ring`]: the consistent-hash ring used to pick which peer owns a key.
//! - [`singleflight`]: per-key request coalescing.
//! - [`peers`]: the `Getter`/`PeerPicker`/`PeerGetter` traits a [`group::Group`]
//!   is wired up with.
//! - [`group`]: the `Group` coordinator and the process-wide `Registry`.
//! - [`error`]: the crate-wide `Error` type.
//! - [`config`]: plain configuration structs, one per tunable component.
//! - [`transport`]: the reference HTTP peer wire protocol, behind the
//!   `http` feature.

pub mod byteview;
pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod group;
pub(crate) mod list;
pub mod lru;
pub mod peers;
pub mod ring;
pub mod singleflight;

#[cfg(feature = "http")]
pub mod transport;

pub use byteview::ByteView;
pub use error::Error;
pub use group::{Group, Registry};
pub use peers::{Getter, PeerGetter, PeerPicker};
pub use ring::HashRing;
