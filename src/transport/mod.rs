//! Reference peer wire protocol (`feature = "http"`).
//!
//! This module is not required to use the core cache — it exists because
//! spec.md calls interoperability out as desirable, and because the corpus
//! this crate was transformed from consistently reaches for `axum` and
//! `reqwest` rather than hand-rolling HTTP. See [`http::HttpPool`] and
//! [`http::HttpGetter`].

pub mod http;
