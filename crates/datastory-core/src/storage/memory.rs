//! In-memory storage implementation.

use super::{StorageError, StorageResult, StoryStorage};
use crate::story::StorySnapshot;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage for tests and sessions without a disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshots: RefCell<BTreeMap<String, StorySnapshot>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoryStorage for MemoryStorage {
    fn save(&self, id: &str, snapshot: &StorySnapshot) -> StorageResult<()> {
        self.snapshots
            .borrow_mut()
            .insert(id.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<StorySnapshot> {
        self.snapshots
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        self.snapshots.borrow_mut().remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.snapshots.borrow().keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.snapshots.borrow().contains_key(id))
    }
}
