//! Snapshot Module
//!
//! Byte-level load/dump of a serialized cache snapshot. Only the bounded
//! TTL cache consumes a store: it loads at construction and dumps on clear.

mod file;
mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use thiserror::Error;

// == Snapshot Error ==
/// Failure reported by a snapshot store.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Underlying storage I/O failed
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store holds no snapshot yet
    #[error("no snapshot stored")]
    Empty,
}

// == Snapshot Store ==
/// Storage medium for cache snapshots.
///
/// The format of the bytes is owned by the cache; a store only has to hand
/// back exactly what it was last given.
pub trait SnapshotStore: Send + Sync {
    /// Reads the most recent snapshot.
    fn load(&self) -> Result<Vec<u8>, SnapshotError>;

    /// Replaces the stored snapshot with `data`.
    fn dump(&self, data: &[u8]) -> Result<(), SnapshotError>;
}
