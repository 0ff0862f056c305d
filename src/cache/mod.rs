//! Cache Module
//!
//! Two interchangeable in-memory backends behind one contract: a recency
//! ordered LRU cache and a capacity-bounded map with optional TTL expiry.

mod lru;
mod stats;
mod ttl;


// Re-export public types
pub use lru::LruCache;
pub use stats::CacheStats;
pub use ttl::{TtlCache, TtlCacheOptions, DEFAULT_CAPACITY};

use crate::error::Result;

// == Cache Contract ==
/// Generic key-value cache.
///
/// Every call on one instance is atomic with respect to every other call on
/// the same instance.
pub trait Cache<K, V>: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: K, value: V) -> Result<()>;

    /// Returns a copy of the value stored under `key`.
    ///
    /// Fails with [`CacheError::NotFound`](crate::error::CacheError::NotFound)
    /// when the key is absent.
    fn get(&self, key: &K) -> Result<V>;

    /// Removes `key`. Fails with `NotFound` when the key is absent.
    fn delete(&self, key: &K) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;
}
