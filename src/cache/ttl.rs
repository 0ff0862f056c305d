//! TTL Cache Module
//!
//! Capacity-bounded map whose entries are removed by a detached watcher once
//! their TTL has elapsed. A full cache rejects new keys instead of evicting.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::{Cache, CacheStats};
use crate::error::{CacheError, Result};
use crate::snapshot::SnapshotStore;
use crate::tasks::spawn_expiry_watcher;

/// Capacity used when the options ask for zero.
pub const DEFAULT_CAPACITY: usize = 100;

// == Options ==
/// Construction parameters for [`TtlCache`].
#[derive(Clone, Default)]
pub struct TtlCacheOptions {
    /// Maximum number of entries; zero selects [`DEFAULT_CAPACITY`]
    pub capacity: usize,
    /// Lifetime of each entry; zero disables expiry
    pub ttl: Duration,
    /// Snapshot source loaded at construction and written on `clear`
    pub store: Option<Arc<dyn SnapshotStore>>,
    /// Runtime hosting expiry watchers; the shared expiry runtime when unset
    pub runtime: Option<Handle>,
}

impl TtlCacheOptions {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            store: None,
            runtime: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Hosts watchers on `runtime` instead of the shared expiry runtime.
    ///
    /// The runtime needs timers enabled and must outlive every watcher, or
    /// entries set on it never expire.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

struct TtlState<K, V> {
    data: HashMap<K, V>,
    stats: CacheStats,
}

// == TTL Cache ==
/// Thread-safe bounded cache with optional per-entry expiry.
///
/// Every `set` on a cache with a non-zero TTL starts its own watcher. Watchers
/// are never cancelled; one that fires after its key was deleted, cleared, or
/// re-set simply removes whatever is stored under the key at that moment, or
/// does nothing if the key is gone.
pub struct TtlCache<K, V> {
    capacity: usize,
    ttl: Duration,
    store: Option<Arc<dyn SnapshotStore>>,
    state: Mutex<TtlState<K, V>>,
    runtime: Option<Handle>,
    this: Weak<TtlCache<K, V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Serialize + DeserializeOwned + Send + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache, seeding it from the snapshot store when one is given.
    ///
    /// A snapshot that cannot be loaded or decoded, or that holds more
    /// entries than the capacity, is discarded with a warning.
    pub fn new(options: TtlCacheOptions) -> Arc<Self> {
        let capacity = if options.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            options.capacity
        };

        let data = options
            .store
            .as_deref()
            .map(|store| load_snapshot(store, capacity))
            .unwrap_or_default();

        Arc::new_cyclic(|this| Self {
            capacity,
            ttl: options.ttl,
            store: options.store,
            state: Mutex::new(TtlState {
                data,
                stats: CacheStats::new(),
            }),
            runtime: options.runtime,
            this: this.clone(),
        })
    }

    /// Returns the effective capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured TTL; zero means entries never expire.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.state.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.data.len())
    }

    fn watch(&self, key: K) {
        let cache = self.this.clone();
        spawn_expiry_watcher(self.runtime.as_ref(), self.ttl, move || {
            if let Some(cache) = cache.upgrade() {
                cache.expire(&key);
            }
        });
    }

    /// Removes `key` if it is still present. Absence is expected here.
    fn expire(&self, key: &K) {
        let mut state = self.state.lock();
        if state.data.remove(key).is_some() {
            state.stats.record_expiration();
            debug!(key = ?key, "expired cache entry");
        }
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Serialize + DeserializeOwned + Send + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + 'static,
{
    fn set(&self, key: K, value: V) -> Result<()> {
        let mut state = self.state.lock();

        if !state.data.contains_key(&key) && state.data.len() >= self.capacity {
            return Err(CacheError::CacheFull);
        }

        let watched = (!self.ttl.is_zero()).then(|| key.clone());
        state.data.insert(key, value);
        drop(state);

        if let Some(key) = watched {
            self.watch(key);
        }
        Ok(())
    }

    fn get(&self, key: &K) -> Result<V> {
        let mut state = self.state.lock();

        let value = state.data.get(key).cloned();
        state.stats.record_lookup(value.is_some());
        value.ok_or_else(|| CacheError::not_found(key))
    }

    fn delete(&self, key: &K) -> Result<()> {
        let mut state = self.state.lock();

        match state.data.remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::not_found(key)),
        }
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.state.lock();

        if let Some(store) = &self.store {
            let bytes = serde_json::to_vec(&state.data)?;
            store.dump(&bytes)?;
        }

        state.data = HashMap::new();
        Ok(())
    }
}

// == Snapshot Loading ==
fn load_snapshot<K, V>(store: &dyn SnapshotStore, capacity: usize) -> HashMap<K, V>
where
    K: Eq + Hash + DeserializeOwned,
    V: DeserializeOwned,
{
    let bytes = match store.load() {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("loading cache snapshot failed: {}", err);
            return HashMap::new();
        }
    };

    let data: HashMap<K, V> = match serde_json::from_slice(&bytes) {
        Ok(data) => data,
        Err(err) => {
            warn!("decoding cache snapshot failed: {}", err);
            return HashMap::new();
        }
    };

    if data.len() > capacity {
        warn!(
            "cache snapshot holds {} entries, more than capacity {}",
            data.len(),
            capacity
        );
        return HashMap::new();
    }

    data
}
