//! # Metadata Store
//!
//! Pimedia keeps a split model:
//! 1. **Truth**: files and folders on disk. An item exists if and only if its physical entry does.
//! 2. **Sidecar**: one JSON document (`.metadata.json`) with the attributes the filesystem
//!    cannot express: favorite flag, trashed flag, original location.
//!
//! ## Semantics
//!
//! - At most one record per `(id, owner)`. A missing record means "not favorite, not trashed".
//! - The sidecar is advisory. A missing or unparseable document reads as empty, and the
//!   next write replaces it. This trades strictness for availability: a torn or hand-broken
//!   file heals itself, at the cost of the flags it held.
//! - The document is shared by all owners, so every mutation, whatever its owner, goes
//!   through one critical section ([`MetadataStore::transact`]): load, mutate, save. Two
//!   writers can never both read the same prior state, so no update is silently lost.
//!   The lock is in-process; a second process writing the same file is not supported.
//!
//! ## Implementations
//!
//! - [`fs_backend::JsonFileBackend`]: production, atomic tmp-then-rename writes.
//! - [`mem_backend::MemBackend`]: for testing store logic without the filesystem.

use crate::error::{MediaError, Result};
use crate::model::{MetadataRecord, RecordPatch};
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::RecordBackend;
pub use fs_backend::JsonFileBackend;
pub use mem_backend::MemBackend;

pub struct MetadataStore<B: RecordBackend> {
    backend: B,
    write_lock: Mutex<()>,
}

impl MetadataStore<JsonFileBackend> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(JsonFileBackend::new(path))
    }
}

impl<B: RecordBackend> MetadataStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Every record of every owner. Never fails: storage problems read as an empty store.
    pub fn load_all(&self) -> Vec<MetadataRecord> {
        match self.backend.load() {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "metadata store unreadable, treating it as empty");
                Vec::new()
            }
        }
    }

    fn load_for_write(&self) -> Result<Vec<MetadataRecord>> {
        match self.backend.load() {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(MediaError::Serialization(e)) => {
                warn!(error = %e, "metadata store corrupt, it will be replaced");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn records_for(&self, owner: &str) -> Vec<MetadataRecord> {
        self.load_all()
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect()
    }

    pub fn find(&self, id: &str, owner: &str) -> Option<MetadataRecord> {
        self.load_all().into_iter().find(|r| r.matches(id, owner))
    }

    /// Runs `f` on the full record set inside the store's critical section and
    /// persists the result if it changed.
    ///
    /// This is the only way records are written. `f` sees the state left by the
    /// previous writer, whatever its owner. A document that cannot be parsed is
    /// replaced, but one that cannot be read fails the transaction before `f` runs.
    pub fn transact<T>(&self, f: impl FnOnce(&mut Vec<MetadataRecord>) -> T) -> Result<T> {
        let _guard = self.write_lock.lock();

        let before = self.load_for_write()?;
        let mut records = before.clone();
        let out = f(&mut records);

        if records != before {
            self.backend.save(&records)?;
            debug!(records = records.len(), "metadata store saved");
        }
        Ok(out)
    }

    /// Merge-upserts each patch: fields the patch leaves as `None` keep their stored value;
    /// records that don't exist yet are appended.
    pub fn upsert(&self, patches: &[RecordPatch]) -> Result<()> {
        self.transact(|records| {
            for patch in patches {
                merge_patch(records, patch);
            }
        })
    }

    /// Removes the record for `(id, owner)`. Returns whether one existed.
    pub fn remove(&self, id: &str, owner: &str) -> Result<bool> {
        self.transact(|records| {
            let before = records.len();
            records.retain(|r| !r.matches(id, owner));
            records.len() != before
        })
    }
}

pub(crate) fn merge_patch(records: &mut Vec<MetadataRecord>, patch: &RecordPatch) {
    match records
        .iter_mut()
        .find(|r| r.matches(&patch.id, &patch.owner))
    {
        Some(existing) => existing.apply(patch),
        None => records.push(patch.clone().into_record()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn store() -> MetadataStore<MemBackend> {
        MetadataStore::with_backend(MemBackend::new())
    }

    #[test]
    fn empty_store_loads_nothing() {
        assert!(store().load_all().is_empty());
    }

    #[test]
    fn upsert_appends_then_merges() {
        let store = store();
        store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(true)])
            .unwrap();
        store
            .upsert(&[RecordPatch::new("a.jpg", "alice").trashed("My Files")])
            .unwrap();

        let all = store.load_all();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_favorite, "favorite must survive a partial patch");
        assert!(all[0].is_trashed);
        assert_eq!(all[0].original_path.as_deref(), Some("My Files"));
    }

    #[test]
    fn upsert_keeps_key_stable() {
        let store = store();
        store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(true)])
            .unwrap();
        let key = store.find("a.jpg", "alice").unwrap().key;
        store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(false)])
            .unwrap();
        assert!(key.is_some());
        assert_eq!(store.find("a.jpg", "alice").unwrap().key, key);
    }

    #[test]
    fn same_id_for_different_owners_are_distinct() {
        let store = store();
        store
            .upsert(&[
                RecordPatch::new("a.jpg", "alice").favorite(true),
                RecordPatch::new("a.jpg", "bob").favorite(false),
            ])
            .unwrap();
        assert_eq!(store.load_all().len(), 2);
        assert!(store.find("a.jpg", "alice").unwrap().is_favorite);
        assert!(!store.find("a.jpg", "bob").unwrap().is_favorite);
        assert_eq!(store.records_for("bob").len(), 1);
    }

    #[test]
    fn remove_is_a_noop_when_absent() {
        let store = store();
        assert!(!store.remove("ghost.jpg", "alice").unwrap());
        store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(true)])
            .unwrap();
        assert!(!store.remove("a.jpg", "bob").unwrap());
        assert!(store.remove("a.jpg", "alice").unwrap());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn corrupt_store_reads_empty_and_heals_on_write() {
        let store = MetadataStore::with_backend(MemBackend::with_records(vec![
            MetadataRecord::new("old.jpg", "alice"),
        ]));
        store.backend().set_simulate_corruption(true);
        assert!(store.load_all().is_empty());

        store
            .upsert(&[RecordPatch::new("new.jpg", "alice").favorite(true)])
            .unwrap();
        store.backend().set_simulate_corruption(false);

        let all = store.load_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "new.jpg");
    }

    #[test]
    fn read_errors_abort_the_transaction_without_writing() {
        let store = store();
        store
            .upsert(&[
                RecordPatch::new("a.jpg", "alice").favorite(true),
                RecordPatch::new("b.jpg", "bob").favorite(true),
            ])
            .unwrap();

        store.backend().set_simulate_read_error(true);
        let result = store.upsert(&[RecordPatch::new("c.jpg", "carol").favorite(true)]);
        assert!(matches!(result, Err(MediaError::Io(_))));
        store.backend().set_simulate_read_error(false);

        let ids: Vec<String> = store.load_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn write_errors_propagate() {
        let store = store();
        store.backend().set_simulate_write_error(true);
        assert!(store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(true)])
            .is_err());
    }

    #[test]
    fn unchanged_transaction_does_not_write() {
        let store = store();
        store.backend().set_simulate_write_error(true);
        // Nothing to remove, so nothing to save, so no error
        assert!(!store.remove("a.jpg", "alice").unwrap());
    }

    #[test]
    fn paused_writers_do_not_lose_updates() {
        let store = Arc::new(store());
        let handles: Vec<_> = ["a.jpg", "b.jpg"]
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .transact(|records| {
                            // Pause between the load and the save
                            thread::sleep(Duration::from_millis(50));
                            merge_patch(records, &RecordPatch::new(id, "alice").favorite(true));
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.load_all();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.is_favorite));
    }
}
