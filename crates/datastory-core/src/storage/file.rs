//! File-based storage implementation for native platforms.

use super::{StorageError, StorageResult, StoryStorage};
use crate::story::StorySnapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each snapshot as a JSON file in one directory.
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::Io(format!("Failed to create {}: {}", base_path.display(), e))
        })?;
        Ok(Self { base_path })
    }

    /// Create file storage in the user's data directory.
    ///
    /// On Linux: `~/.local/share/datastory/progress/`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("datastory").join("progress"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }
}

impl StoryStorage for FileStorage {
    fn save(&self, id: &str, snapshot: &StorySnapshot) -> StorageResult<()> {
        let path = self.snapshot_path(id);
        let json = snapshot
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Saved story progress to {}", path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<StorySnapshot> {
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        StorySnapshot::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let path = self.snapshot_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.snapshot_path(id).exists())
    }
}
