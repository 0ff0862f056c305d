//! Mini Cache - thread-safe in-process key-value caches
//!
//! Two backends share the [`Cache`] contract:
//! - [`LruCache`]: evicts the least recently used entry when full
//! - [`TtlCache`]: rejects new keys when full and expires entries after a TTL,
//!   optionally snapshotting its contents through a [`SnapshotStore`]
//!
//! ```
//! use mini_cache::{Cache, LruCache};
//!
//! let cache = LruCache::new(2);
//! cache.set("a", 1).unwrap();
//! cache.set("b", 2).unwrap();
//! cache.get(&"a").unwrap();
//! cache.set("c", 3).unwrap(); // evicts "b"
//!
//! assert!(cache.get(&"b").is_err());
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheStats, LruCache, TtlCache, TtlCacheOptions};
pub use config::Config;
pub use error::{CacheError, Result};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotStore};
