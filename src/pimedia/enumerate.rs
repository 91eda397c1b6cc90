//! # Tree Enumeration
//!
//! Builds the logical listing of one owner by joining physical entries with their
//! metadata records. Nothing here is cached: every call walks the disk again.
//!
//! - The live tree is walked recursively, depth first, each folder emitted before
//!   its contents.
//! - The trash is scanned one level deep only. A trashed folder is one item; its
//!   contents travel with it and are not listed while trashed.
//! - A trash entry is only shown if a record vouches for it. Entries without one
//!   are orphans: they are logged and left out (see `doctor` to adopt them).

use crate::error::{MediaError, Result};
use crate::model::{MediaItem, MediaKind, MetadataRecord, TRASH_MARKER};
use crate::paths::{breadcrumb, item_id, StorageLayout};
use crate::store::{MetadataStore, RecordBackend};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A direct child of an owner's trash root.
#[derive(Debug, Clone)]
pub(crate) struct TrashEntry {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub created_at: DateTime<Utc>,
}

pub fn list<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
) -> Result<Vec<MediaItem>> {
    let root = layout.owner_root(owner)?;
    let trash = layout.owner_trash(owner)?;
    fs::create_dir_all(&root).map_err(MediaError::Io)?;
    fs::create_dir_all(&trash).map_err(MediaError::Io)?;

    let records = store.records_for(owner);
    let by_id: HashMap<&str, &MetadataRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut items = walk_live(layout, owner, &root, &by_id);

    for entry in scan_trash(layout, owner)? {
        let Some(record) = by_id.get(entry.id.as_str()) else {
            warn!(owner, id = %entry.id, "orphaned trash entry has no record, hiding it");
            continue;
        };
        items.push(MediaItem {
            kind: MediaKind::classify(&entry.path, entry.is_dir),
            id: entry.id,
            name: entry.name,
            logical_path: TRASH_MARKER.to_string(),
            created_at: entry.created_at,
            is_favorite: record.is_favorite,
            is_trashed: true,
            original_logical_path: record.original_path.clone(),
            owner: owner.to_string(),
            key: record.key,
        });
    }

    items.retain(|item| item.owner == owner);
    debug!(owner, items = items.len(), "listing built");
    Ok(items)
}

fn walk_live(
    layout: &StorageLayout,
    owner: &str,
    root: &Path,
    by_id: &HashMap<&str, &MetadataRecord>,
) -> Vec<MediaItem> {
    let mut items = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(owner, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        match live_item(layout, owner, &entry, by_id) {
            Ok(item) => items.push(item),
            Err(e) => warn!(owner, path = %entry.path().display(), error = %e, "skipping entry"),
        }
    }

    items
}

fn live_item(
    layout: &StorageLayout,
    owner: &str,
    entry: &walkdir::DirEntry,
    by_id: &HashMap<&str, &MetadataRecord>,
) -> Result<MediaItem> {
    let path = entry.path();
    let parent = path
        .parent()
        .ok_or_else(|| MediaError::InvalidPath(path.display().to_string()))?;
    let name = file_name(path)?;
    let id = item_id(layout, owner, path)?;
    let logical_path = breadcrumb(layout, owner, parent)?;
    let metadata = entry
        .metadata()
        .map_err(|e| MediaError::Io(std::io::Error::other(e)))?;
    let record = by_id.get(id.as_str());

    Ok(MediaItem {
        kind: MediaKind::classify(path, entry.file_type().is_dir()),
        id,
        name,
        logical_path,
        created_at: created_at(&metadata),
        is_favorite: record.is_some_and(|r| r.is_favorite),
        is_trashed: false,
        original_logical_path: None,
        owner: owner.to_string(),
        key: record.and_then(|r| r.key),
    })
}

/// Direct children of the owner's trash root, records not consulted.
pub(crate) fn scan_trash(layout: &StorageLayout, owner: &str) -> Result<Vec<TrashEntry>> {
    let trash = layout.owner_trash(owner)?;
    let entries = match fs::read_dir(&trash) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(MediaError::Io(e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(MediaError::Io)?;
        let path = entry.path();
        let scanned = file_name(&path).and_then(|name| {
            let metadata = entry.metadata().map_err(MediaError::Io)?;
            Ok(TrashEntry {
                id: item_id(layout, owner, &path)?,
                name,
                is_dir: metadata.is_dir(),
                created_at: created_at(&metadata),
                path: path.clone(),
            })
        });
        match scanned {
            Ok(trash_entry) => found.push(trash_entry),
            Err(e) => warn!(owner, path = %path.display(), error = %e, "skipping trash entry"),
        }
    }
    Ok(found)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| MediaError::InvalidPath(format!("unusable name {}", path.display())))
}

/// Birth time where the platform has it, modification time otherwise.
fn created_at(metadata: &fs::Metadata) -> DateTime<Utc> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
