use crate::commands::helpers::require_entry;
use crate::commands::{run_batch, BatchResult, Change};
use crate::error::Result;
use crate::model::MetadataRecord;
use crate::paths::{locate_item, StorageLayout};
use crate::store::{MetadataStore, RecordBackend};
use tracing::info;

/// Flips the favorite flag of each item independently.
///
/// A mixed batch is not forced to a common value: favorites become plain, plain
/// items become favorites. An item without a record counts as not favorite, so
/// its first toggle creates the record with the flag set.
pub fn toggle<B: RecordBackend, I: AsRef<str>>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    ids: &[I],
) -> BatchResult {
    let result = run_batch(ids, "toggle favorite on", "Favorite toggled", |id| {
        toggle_one(layout, store, owner, id)
    });
    info!(owner, items = result.items.len(), "favorite toggle finished");
    result
}

fn toggle_one<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    id: &str,
) -> Result<Change> {
    let location = locate_item(layout, owner, id)?;
    require_entry(&location.path, id)?;

    let is_favorite = store.transact(|records| {
        match records.iter_mut().find(|r| r.matches(id, owner)) {
            Some(record) => {
                record.is_favorite = !record.is_favorite;
                record.is_favorite
            }
            None => {
                let mut record = MetadataRecord::new(id, owner);
                record.is_favorite = true;
                records.push(record);
                true
            }
        }
    })?;

    Ok(Change::Favorite { is_favorite })
}
