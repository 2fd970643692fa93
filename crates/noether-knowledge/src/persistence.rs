//! Snapshot persistence - save and load collections across restarts.
//!
//! Provides the `SnapshotPersistence` trait and a `JsonFileStore`
//! implementation that stores each collection as a JSON list of canonical
//! strings, rewritten wholesale on every snapshot.

use crate::error::{StoreError, StoreResult};
use noether_types::CollectionKind;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Trait for collection persistence across restarts
pub trait SnapshotPersistence: Send + Sync {
    /// Save the full canonical-string list for one collection
    fn save(&self, kind: CollectionKind, canonicals: &[String]) -> StoreResult<()>;

    /// Load one collection's canonical strings.
    ///
    /// Returns an empty list if no persisted state exists.
    fn load(&self, kind: CollectionKind) -> StoreResult<Vec<String>>;
}

/// JSON-file based persistence.
///
/// One file per collection inside the data directory. Writes are atomic
/// (write to `.tmp`, then rename) to prevent corruption from interrupted
/// writes.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, kind: CollectionKind) -> PathBuf {
        match kind {
            CollectionKind::Proven => self.dir.join("knowledge_base.json"),
            CollectionKind::Speculative => self.dir.join("speculative.json"),
        }
    }
}

impl SnapshotPersistence for JsonFileStore {
    fn save(&self, kind: CollectionKind, canonicals: &[String]) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(canonicals)
            .map_err(|e| StoreError::Serialization(format!("serialization failed: {}", e)))?;

        let path = self.path_for(kind);
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &path)?;

        Ok(())
    }

    fn load(&self, kind: CollectionKind) -> StoreResult<Vec<String>> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)?;
        let canonicals: Vec<String> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(format!("deserialization failed: {}", e)))?;

        Ok(canonicals)
    }
}

/// In-memory persistence (for testing)
pub struct InMemoryStore {
    data: std::sync::Mutex<HashMap<CollectionKind, Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: std::sync::Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotPersistence for InMemoryStore {
    fn save(&self, kind: CollectionKind, canonicals: &[String]) -> StoreResult<()> {
        let mut data = self.data.lock().map_err(|_| StoreError::LockPoisoned)?;
        data.insert(kind, canonicals.to_vec());
        Ok(())
    }

    fn load(&self, kind: CollectionKind) -> StoreResult<Vec<String>> {
        let data = self.data.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(data.get(&kind).cloned().unwrap_or_default())
    }
}
