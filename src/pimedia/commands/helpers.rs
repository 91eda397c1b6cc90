use crate::error::{MediaError, Result};
use crate::model::{MetadataRecord, RecordPatch};
use crate::store::{merge_patch, MetadataStore, RecordBackend};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Fails with `NotFound` unless something (file, folder or link) sits at `path`.
pub(crate) fn require_entry(path: &Path, id: &str) -> Result<fs::Metadata> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(meta),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(MediaError::NotFound(id.to_string())),
        Err(e) => Err(MediaError::Io(e)),
    }
}

pub(crate) fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Renames `from` to `to`, refusing to replace anything already at `to`.
pub(crate) fn move_entry(from: &Path, to: &Path) -> Result<()> {
    if entry_exists(to) {
        return Err(MediaError::AlreadyExists(to.display().to_string()));
    }
    fs::rename(from, to).map_err(MediaError::Io)?;
    debug!(from = %from.display(), to = %to.display(), "renamed");
    Ok(())
}

/// Moves an item on disk and re-keys its records in one step.
///
/// The rename runs inside the store's critical section, so no other move can slip
/// between the destination check and the rename. If the sidecar cannot be updated
/// afterwards the rename is undone, so the record never points at a location the
/// item has left.
pub(crate) fn relocate<B: RecordBackend>(
    store: &MetadataStore<B>,
    owner: &str,
    old_id: &str,
    from: &Path,
    to: &Path,
    patch: &RecordPatch,
) -> Result<()> {
    let mut moved = false;
    let outcome = store.transact(|records| -> Result<()> {
        move_entry(from, to)?;
        moved = true;
        rekey(records, owner, old_id, patch);
        Ok(())
    });

    match outcome {
        Ok(inner) => inner,
        Err(e) => {
            if moved {
                if let Err(undo) = fs::rename(to, from) {
                    warn!(
                        from = %to.display(),
                        to = %from.display(),
                        error = %undo,
                        "could not undo rename after metadata failure"
                    );
                }
            }
            Err(e)
        }
    }
}

/// Points the item's record, and the records of everything inside it, at `patch.id`,
/// then merges `patch` into the item's record (creating it if needed).
pub(crate) fn rekey(
    records: &mut Vec<MetadataRecord>,
    owner: &str,
    old_id: &str,
    patch: &RecordPatch,
) {
    let new_id = patch.id.as_str();

    // Anything already keyed at the destination is stale: nothing was there on disk
    records.retain(|r| !(r.matches(new_id, owner) || r.is_under(new_id, owner)));

    for record in records
        .iter_mut()
        .filter(|r| r.matches(old_id, owner) || r.is_under(old_id, owner))
    {
        record.rebase(old_id, new_id);
    }

    merge_patch(records, patch);
}

/// Removes the item's record and the records of everything inside it.
/// Returns how many were dropped.
pub(crate) fn drop_records(records: &mut Vec<MetadataRecord>, owner: &str, id: &str) -> usize {
    let before = records.len();
    records.retain(|r| !(r.matches(id, owner) || r.is_under(id, owner)));
    before - records.len()
}
