//! In-memory snapshot store.

use parking_lot::Mutex;

use super::{SnapshotError, SnapshotStore};

/// Holds the latest snapshot in a byte buffer.
///
/// Useful for tests and for handing a snapshot between cache instances
/// inside one process.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    data: Mutex<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    /// Creates an empty store; `load` fails until the first dump.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `data`.
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Mutex::new(Some(data.into())),
        }
    }

    /// Returns a copy of the stored snapshot, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Vec<u8>, SnapshotError> {
        self.data.lock().clone().ok_or(SnapshotError::Empty)
    }

    fn dump(&self, data: &[u8]) -> Result<(), SnapshotError> {
        *self.data.lock() = Some(data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemorySnapshotStore::new();
        assert!(matches!(store.load(), Err(SnapshotError::Empty)));
        assert!(store.contents().is_none());
    }

    #[test]
    fn test_memory_store_keeps_last_dump() {
        let store = MemorySnapshotStore::with_data("first");
        store.dump(b"second").unwrap();
        assert_eq!(store.load().unwrap(), b"second".to_vec());
    }
}
