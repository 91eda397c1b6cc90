use crate::commands::helpers::{entry_exists, relocate};
use crate::commands::{run_batch, BatchResult, Change};
use crate::error::{MediaError, Result};
use crate::model::{RecordPatch, ROOT_MARKER};
use crate::paths::{breadcrumb, item_id, locate_item, resolve, Area, StorageLayout};
use crate::store::{MetadataStore, RecordBackend};
use std::fs;
use tracing::info;

/// Moves trashed items back to the folder they were trashed from.
///
/// An id without a trashed record is left alone (`Change::Unchanged`). The
/// destination folder is recreated if it was removed in the meantime.
pub fn run<B: RecordBackend, I: AsRef<str>>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    ids: &[I],
) -> BatchResult {
    let result = run_batch(ids, "restore", "Restored", |id| {
        restore_one(layout, store, owner, id)
    });
    info!(owner, items = result.items.len(), "restore finished");
    result
}

fn restore_one<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    id: &str,
) -> Result<Change> {
    let record = match store.find(id, owner) {
        Some(record) if record.is_trashed => record,
        _ => return Ok(Change::Unchanged),
    };

    let location = locate_item(layout, owner, id)?;
    if location.area != Area::Trash {
        return Err(MediaError::InvalidPath(format!("{} is not in the trash", id)));
    }
    if !entry_exists(&location.path) {
        return Err(MediaError::OrphanedRecord(id.to_string()));
    }

    let original = record.original_path.as_deref().unwrap_or(ROOT_MARKER);
    let destination_dir = resolve(layout, owner, original)?;
    if destination_dir.exists() && !destination_dir.is_dir() {
        return Err(MediaError::AlreadyExists(format!("{} is a file", original)));
    }
    fs::create_dir_all(&destination_dir).map_err(MediaError::Io)?;

    let name = location
        .path
        .file_name()
        .ok_or_else(|| MediaError::InvalidPath(id.to_string()))?;
    let destination = destination_dir.join(name);
    let new_id = item_id(layout, owner, &destination)?;

    let patch = RecordPatch::new(new_id.clone(), owner).restored();
    relocate(store, owner, id, &location.path, &destination, &patch)?;

    Ok(Change::Restored {
        new_id,
        logical_path: breadcrumb(layout, owner, &destination_dir)?,
    })
}
