//! Persistence of story progress.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::story::StorySnapshot;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Story not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend holding saved story progress, keyed by student or session ID.
pub trait StoryStorage {
    /// Save a snapshot.
    fn save(&self, id: &str, snapshot: &StorySnapshot) -> StorageResult<()>;

    /// Load a snapshot.
    fn load(&self, id: &str) -> StorageResult<StorySnapshot>;

    /// Delete a snapshot. Missing IDs are not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all saved IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a snapshot exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
