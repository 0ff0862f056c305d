//! File-backed snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use super::{SnapshotError, SnapshotStore};

/// Keeps the snapshot in a single file, rewritten whole on every dump.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file does not need to exist until the first dump.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(fs::read(&self.path)?)
    }

    fn dump(&self, data: &[u8]) -> Result<(), SnapshotError> {
        fs::write(&self.path, data)?;
        Ok(())
    }
}
