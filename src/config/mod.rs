//! Plain, public-field-style configuration types, one per tunable component.
//!
//! Each type wraps a single concern with a constructor and accessors, no
//! builder, no `Default` magic beyond the values the original
//! implementation itself defaults to.

pub mod group;
pub mod http;
pub mod ring;

pub use group::GroupConfig;
pub use http::HttpPoolConfig;
pub use ring::RingConfig;
