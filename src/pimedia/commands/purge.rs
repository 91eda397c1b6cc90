use crate::commands::helpers::drop_records;
use crate::commands::{run_batch, BatchResult, Change};
use crate::error::{MediaError, Result};
use crate::paths::{locate_item, StorageLayout};
use crate::store::{MetadataStore, RecordBackend};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Permanently removes items, live or trashed, with everything inside them.
///
/// A path that is already gone counts as removed as long as a record still
/// referred to it; an id with neither a file nor a record is `NotFound`.
pub fn run<B: RecordBackend, I: AsRef<str>>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    ids: &[I],
) -> BatchResult {
    let result = run_batch(ids, "delete", "Deleted", |id| {
        purge_one(layout, store, owner, id)
    });
    info!(owner, items = result.items.len(), "purge finished");
    result
}

fn purge_one<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    id: &str,
) -> Result<Change> {
    let location = locate_item(layout, owner, id)?;
    let removed_file = remove_path(&location.path)?;
    let removed_records = store.transact(|records| drop_records(records, owner, id))?;

    if !removed_file && removed_records == 0 {
        return Err(MediaError::NotFound(id.to_string()));
    }
    debug!(owner, id, removed_file, removed_records, "purged");
    Ok(Change::Deleted)
}

/// Removes a file, link or whole folder. `Ok(false)` if nothing was there.
fn remove_path(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(MediaError::Io(e)),
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match removed {
        Ok(()) => Ok(true),
        // Lost a race with another remover: the goal is met
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(MediaError::Io(e)),
    }
}
