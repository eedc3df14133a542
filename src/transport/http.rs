//! HTTP peer transport.
//!
//! Ported from `original_source/geeCache/http.go`. The wire format is
//! `GET <base_path><group>/<key>`, both segments percent-escaped the way
//! Go's `url.QueryEscape` escapes them (space becomes `+`); responses are
//! `200` with an `application/octet-stream` body on success, `400` for a
//! malformed path, `404` for an unknown group, `500` for a loader failure.
//! The `400` case — a path under `base_path` that doesn't split into
//! exactly `{group}/{key}` (e.g. `base_path` alone, or `base_path` plus a
//! single segment with no `/`) — cannot be produced by the `{group}/{key}`
//! route itself, since axum simply declines to match it; a router
//! `fallback` catches it instead. See [`serve_unmatched`].
//!
//! The server side runs its own single-threaded Tokio runtime so the rest
//! of the crate — including every `Getter`/`PeerPicker` it serves — stays
//! synchronous, per spec.md §5.

use std::fmt;
use std::net::ToSocketAddrs;
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::info;

use crate::config::HttpPoolConfig;
use crate::error::Error;
use crate::group::Registry;
use crate::peers::{PeerGetter, PeerPicker};
use crate::ring::HashRing;

/// Serves this process's groups to peers, and picks which peer owns a key
/// when this process is not the owner.
pub struct HttpPool {
    self_addr: String,
    config: HttpPoolConfig,
    registry: Arc<Registry>,
    peers: RwLock<PeerSet>,
}

impl fmt::Debug for HttpPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peers = self.peers.read().unwrap();
        f.debug_struct("HttpPool")
            .field("self_addr", &self.self_addr)
            .field("base_path", &self.config.base_path())
            .field("peers", &peers.getters.len())
            .finish()
    }
}

#[derive(Default)]
struct PeerSet {
    ring: HashRing,
    getters: std::collections::HashMap<String, HttpGetter>,
}

impl HttpPool {
    /// Creates a pool serving `registry`'s groups, identifying itself to
    /// peers as `self_addr` (e.g. `"10.0.0.1:8000"`).
    pub fn new(self_addr: impl Into<String>, registry: Arc<Registry>, config: HttpPoolConfig) -> Self {
        Self {
            self_addr: self_addr.into(),
            config,
            registry,
            peers: RwLock::new(PeerSet::default()),
        }
    }

    /// Replaces the peer set this pool will route requests to, rebuilding
    /// the consistent-hash ring and one [`HttpGetter`] per peer.
    pub fn set_peers(&self, peer_addrs: &[impl AsRef<str>]) {
        let mut ring = HashRing::default();
        ring.add(peer_addrs);
        let getters = peer_addrs
            .iter()
            .map(|addr| {
                let addr = addr.as_ref().to_string();
                let getter = HttpGetter::new(format!("{}{}", addr, self.config.base_path()));
                (addr, getter)
            })
            .collect();
        *self.peers.write().unwrap() = PeerSet { ring, getters };
    }

    /// Builds the Axum router serving this pool's configured base path.
    pub fn router(self: Arc<Self>) -> Router {
        let path = format!("{}{{group}}/{{key}}", self.config.base_path());
        Router::new()
            .route(&path, get(serve_request))
            .fallback(serve_unmatched)
            .with_state(self)
    }

    /// Runs an HTTP server for this pool on `addr`, blocking the calling
    /// thread. Spins up its own single-threaded Tokio runtime internally.
    pub fn serve(self: Arc<Self>, addr: impl ToSocketAddrs) -> std::io::Result<()> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no address"))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()?;
        info!("[{}] listening on {addr}", self.self_addr);
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, self.router()).await
        })
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.read().unwrap();
        let owner = peers.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }
        let getter = peers.getters.get(owner)?.clone();
        Some(Arc::new(getter))
    }
}

/// HTTP client side of the peer protocol — fetches a key for a group from
/// one specific remote peer.
#[derive(Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl fmt::Debug for HttpGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGetter")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpGetter {
    /// Creates a getter that talks to the peer at `base_url` (including the
    /// trailing base path, e.g. `"http://10.0.0.2:8000/_peercache/"`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl PeerGetter for HttpGetter {
    fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, Error> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            escape(group),
            escape(key),
        );
        let response = self.client.get(&url).send().map_err(Error::loader)?;
        if !response.status().is_success() {
            return Err(Error::loader(RemoteStatus(response.status().as_u16())));
        }
        response.bytes().map(|b| b.to_vec()).map_err(Error::loader)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("server returned status {0}")]
struct RemoteStatus(u16);

fn escape(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

async fn serve_request(
    State(pool): State<Arc<HttpPool>>,
    Path((group, key)): Path<(String, String)>,
) -> Response {
    info!("[{}] GET {group}/{key}", pool.self_addr);
    let Some(group) = pool.registry.get(&group) else {
        return (StatusCode::NOT_FOUND, format!("no such group: {group}")).into_response();
    };
    match group.get(&key) {
        Ok(view) => (
            StatusCode::OK,
            [("content-type", "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Catches every request the `{base_path}{group}/{key}` route did not
/// match. A path under `base_path` reaches here only because it didn't
/// split into exactly two segments — `original_source/geeCache/http.go`'s
/// `http.Error(w, "bad request", http.StatusBadRequest)` case. A path
/// outside `base_path` entirely is ordinary client input to this router
/// (unlike the original, where the same condition means an external mux
/// misrouted a request to this handler and is treated as fatal), so it
/// gets a plain `404` rather than the original's crashing panic.
async fn serve_unmatched(State(pool): State<Arc<HttpPool>>, uri: Uri) -> Response {
    if uri.path().starts_with(pool.config.base_path()) {
        (StatusCode::BAD_REQUEST, "bad request").into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
