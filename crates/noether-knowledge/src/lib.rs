//! Noether Knowledge - deduplicated knowledge store with snapshot persistence
//!
//! Two ordered, deduplicated collections (proven and speculative) behind a
//! single mutex. Membership check plus insert is one atomic operation, so
//! the classifier can never race a duplicate in. Snapshots rewrite one JSON
//! list of canonical strings per collection every fixed number of accepted
//! insertions; a failed snapshot is logged and the in-memory state stays
//! authoritative.

#![deny(unsafe_code)]

pub mod error;
pub mod persistence;

pub use error::{StoreError, StoreResult};
pub use persistence::{InMemoryStore, JsonFileStore, SnapshotPersistence};

use noether_types::{CollectionKind, KnowledgeEntry, Verdict};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Result of an insert attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The entry was new and is now stored
    Inserted,
    /// An entry with the same canonical form already exists
    Duplicate,
}

/// One ordered, deduplicated collection
#[derive(Default)]
struct Collection {
    entries: Vec<KnowledgeEntry>,
    keys: HashSet<String>,
}

impl Collection {
    fn insert(&mut self, entry: KnowledgeEntry) -> bool {
        if !self.keys.insert(entry.canonical.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    fn contains(&self, canonical: &str) -> bool {
        self.keys.contains(canonical)
    }

    fn canonicals(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.canonical.clone()).collect()
    }

    fn recent(&self, n: usize) -> Vec<KnowledgeEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..].to_vec()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }
}

struct StoreInner {
    proven: Collection,
    speculative: Collection,
    accepted_since_snapshot: usize,
}

/// Deduplicated knowledge store shared between the evolution loop and the
/// query surface
pub struct KnowledgeStore {
    inner: Mutex<StoreInner>,
    persistence: Arc<dyn SnapshotPersistence>,
    snapshot_interval: usize,
}

impl KnowledgeStore {
    /// Create an empty store. `snapshot_interval` is the number of accepted
    /// insertions between snapshots.
    pub fn new(persistence: Arc<dyn SnapshotPersistence>, snapshot_interval: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                proven: Collection::default(),
                speculative: Collection::default(),
                accepted_since_snapshot: 0,
            }),
            persistence,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Hydrate both collections from the latest snapshots. Entries restored
    /// this way carry no lineage and generation zero.
    pub fn load_from_snapshots(&self) -> StoreResult<usize> {
        let proven = self.persistence.load(CollectionKind::Proven)?;
        let speculative = self.persistence.load(CollectionKind::Speculative)?;

        let mut inner = self.lock()?;
        let mut restored = 0;
        for canonical in proven {
            if inner.proven.insert(restored_entry(canonical, Verdict::Verified)) {
                restored += 1;
            }
        }
        for canonical in speculative {
            if inner
                .speculative
                .insert(restored_entry(canonical, Verdict::AlgebraicFail))
            {
                restored += 1;
            }
        }
        debug!(restored, "Hydrated store from snapshots");
        Ok(restored)
    }

    /// Membership check plus insert as one atomic operation. The canonical
    /// key is checked against both collections before inserting into the
    /// requested one.
    pub fn insert_if_absent(
        &self,
        kind: CollectionKind,
        entry: KnowledgeEntry,
    ) -> StoreResult<InsertOutcome> {
        let snapshot_data = {
            let mut inner = self.lock()?;
            if inner.proven.contains(&entry.canonical)
                || inner.speculative.contains(&entry.canonical)
            {
                return Ok(InsertOutcome::Duplicate);
            }
            match kind {
                CollectionKind::Proven => inner.proven.insert(entry),
                CollectionKind::Speculative => inner.speculative.insert(entry),
            };
            inner.accepted_since_snapshot += 1;
            if inner.accepted_since_snapshot >= self.snapshot_interval {
                inner.accepted_since_snapshot = 0;
                Some((inner.proven.canonicals(), inner.speculative.canonicals()))
            } else {
                None
            }
        };

        // Snapshot I/O happens outside the lock; failure is non-fatal
        if let Some((proven, speculative)) = snapshot_data {
            self.write_snapshot(&proven, &speculative);
        }

        Ok(InsertOutcome::Inserted)
    }

    /// True when either collection holds the canonical key
    pub fn contains(&self, canonical: &str) -> StoreResult<bool> {
        let inner = self.lock()?;
        Ok(inner.proven.contains(canonical) || inner.speculative.contains(canonical))
    }

    pub fn len(&self, kind: CollectionKind) -> StoreResult<usize> {
        let inner = self.lock()?;
        Ok(match kind {
            CollectionKind::Proven => inner.proven.entries.len(),
            CollectionKind::Speculative => inner.speculative.entries.len(),
        })
    }

    pub fn is_empty(&self, kind: CollectionKind) -> StoreResult<bool> {
        Ok(self.len(kind)? == 0)
    }

    /// The most recent `n` entries, oldest first
    pub fn recent(&self, kind: CollectionKind, n: usize) -> StoreResult<Vec<KnowledgeEntry>> {
        let inner = self.lock()?;
        Ok(match kind {
            CollectionKind::Proven => inner.proven.recent(n),
            CollectionKind::Speculative => inner.speculative.recent(n),
        })
    }

    /// Display statements of every entry, in insertion order
    pub fn statements(&self, kind: CollectionKind) -> StoreResult<Vec<String>> {
        let inner = self.lock()?;
        let collection = match kind {
            CollectionKind::Proven => &inner.proven,
            CollectionKind::Speculative => &inner.speculative,
        };
        Ok(collection.entries.iter().map(|e| e.statement.clone()).collect())
    }

    /// Canonical keys of every entry, in insertion order
    pub fn canonicals(&self, kind: CollectionKind) -> StoreResult<Vec<String>> {
        let inner = self.lock()?;
        Ok(match kind {
            CollectionKind::Proven => inner.proven.canonicals(),
            CollectionKind::Speculative => inner.speculative.canonicals(),
        })
    }

    /// Plain-text export: one statement per line
    pub fn export_text(&self, kind: CollectionKind) -> StoreResult<String> {
        let statements = self.statements(kind)?;
        Ok(statements.join("\n"))
    }

    /// Clear both in-memory collections. Snapshot files are left in place.
    pub fn purge(&self) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.proven.clear();
        inner.speculative.clear();
        inner.accepted_since_snapshot = 0;
        debug!("Store purged");
        Ok(())
    }

    /// Write a snapshot immediately, regardless of the interval
    pub fn snapshot_now(&self) -> StoreResult<()> {
        let (proven, speculative) = {
            let inner = self.lock()?;
            (inner.proven.canonicals(), inner.speculative.canonicals())
        };
        self.persistence.save(CollectionKind::Proven, &proven)?;
        self.persistence.save(CollectionKind::Speculative, &speculative)?;
        Ok(())
    }

    fn write_snapshot(&self, proven: &[String], speculative: &[String]) {
        if let Err(err) = self.persistence.save(CollectionKind::Proven, proven) {
            warn!(error = %err, "Knowledge base snapshot failed");
        }
        if let Err(err) = self
            .persistence
            .save(CollectionKind::Speculative, speculative)
        {
            warn!(error = %err, "Speculative snapshot failed");
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn restored_entry(canonical: String, verdict: Verdict) -> KnowledgeEntry {
    KnowledgeEntry {
        statement: canonical.clone(),
        canonical,
        verdict,
        generation: 0,
        lineage: None,
    }
}
