//! Group coordinator.
//!
//! A [`Group`] ties a local [`crate::cache::Cache`], an origin [`Getter`],
//! an optional [`PeerPicker`], and a [`crate::singleflight::Group`]
//! coalescer together into the get → local-hit → peer-fetch → origin-load →
//! populate pipeline. [`Registry`] is the process-wide, name-keyed table of
//! groups, mirroring `original_source/geeCache/geecache.go`'s package-level
//! `groups` map guarded by a `sync.RWMutex`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::{info, warn};

use crate::byteview::ByteView;
use crate::cache::Cache;
use crate::config::GroupConfig;
use crate::error::Error;
use crate::peers::{Getter, PeerGetter, PeerPicker};
use crate::singleflight;

/// A named, independently-capacity-bounded cache backed by an origin
/// loader and, optionally, a set of peers to consult before falling back to
/// that loader.
///
/// The origin loader is stored as `Box<dyn Getter>` rather than a generic
/// parameter: a registry holds groups with different, unrelated loader
/// types (a different closure per group is the common case), and since
/// each closure is its own anonymous type, a generic `Group<G>` could not
/// be named uniformly in a single `Registry`'s map.
pub struct Group {
    name: String,
    getter: Box<dyn Getter>,
    main_cache: Cache<String, ByteView>,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    loader: singleflight::Group<String, ByteView>,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("has_peers", &self.peers.read().unwrap().is_some())
            .field("main_cache", &self.main_cache)
            .finish()
    }
}

impl Group {
    /// Creates a group named `name`, using `getter` as the origin loader
    /// for misses.
    ///
    /// `config` accepts either a [`GroupConfig`] or a bare `u64` local
    /// cache byte budget (`0` meaning unbounded) via [`GroupConfig`]'s
    /// `From<u64>` impl.
    pub fn new(
        name: impl Into<String>,
        config: impl Into<GroupConfig>,
        getter: impl Getter + 'static,
    ) -> Self {
        let config = config.into();
        Self {
            name: name.into(),
            getter: Box::new(getter),
            main_cache: Cache::new(config.cache_bytes()),
            peers: RwLock::new(None),
            loader: singleflight::Group::new(),
        }
    }

    /// Returns this group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers the peer set this group consults before falling back to
    /// its origin loader.
    ///
    /// # Panics
    ///
    /// Panics if called more than once on the same group — registering
    /// peers twice is a programming error, not a recoverable condition.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        let mut guard = self.peers.write().unwrap();
        if guard.is_some() {
            panic!("register_peers called more than once on group {:?}", self.name);
        }
        *guard = Some(peers);
    }

    /// Gets the value for `key`, trying the local cache, then a remote
    /// peer (if any peers are registered and one owns `key`), then the
    /// origin loader — in that order.
    ///
    /// Concurrent calls for the same key across this group coalesce into a
    /// single load via the group's single-flight coalescer.
    pub fn get(&self, key: &str) -> Result<ByteView, Error> {
        if key.is_empty() {
            return Err(Error::KeyRequired);
        }

        if let Some(value) = self.main_cache.get(key) {
            info!("[{}] cache hit for {:?}", self.name, key);
            return Ok(value);
        }

        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView, Error> {
        self.loader.do_call(key.to_string(), || {
            if let Some(peers) = self.peers.read().unwrap().as_ref() {
                if let Some(peer) = peers.pick_peer(key) {
                    match self.get_from_peer(peer.as_ref(), key) {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            warn!("[{}] failed to get {:?} from peer: {}", self.name, key, err);
                        }
                    }
                }
            }
            self.get_locally(key)
        })
    }

    fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView, Error> {
        let bytes = peer.get(&self.name, key)?;
        // Open Question (a): values fetched from a peer are not written
        // into this process's local cache — the peer already owns the key
        // and keeps its own copy cached, so caching it here too would just
        // duplicate storage without changing who answers the next request.
        Ok(ByteView::from_vec(bytes))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView, Error> {
        let bytes = self.getter.get(key)?;
        let value = ByteView::from_vec(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        let size = (key.len() + value.len()) as u64;
        self.main_cache.add(key.to_string(), value, size);
    }
}

/// Process-wide, name-keyed table of groups.
///
/// A single `Registry` is meant to be shared (typically behind a static or
/// an `Arc`) across everything in a process that creates or looks up
/// groups by name.
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("groups", &self.groups.read().unwrap().len())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `group`, or returns the already-registered group of the
    /// same name if one exists.
    ///
    /// Open Question (b): a name collision is not an error — groups are
    /// typically constructed once at process startup from static
    /// configuration, so a second construction attempt under the same name
    /// almost always means the caller re-ran setup code, not that two
    /// genuinely different caches are fighting over one name.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let mut groups = self.groups.write().unwrap();
        if let Some(existing) = groups.get(group.name()) {
            info!("group {:?} already registered", group.name());
            return existing.clone();
        }
        let name = group.name().to_string();
        let group = Arc::new(group);
        groups.insert(name, group.clone());
        group
    }

    /// Looks up a previously registered group by name.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().unwrap().get(name).cloned()
    }
}
