use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// Breadcrumb of an owner's live root.
pub const ROOT_MARKER: &str = "My Files";

/// Breadcrumb shown for every entry sitting in the trash.
pub const TRASH_MARKER: &str = "Trash";

static IMAGE_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["jpg", "jpeg", "png", "gif", "webp"].into_iter().collect());

static VIDEO_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["mp4", "mov", "avi", "mkv"].into_iter().collect());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Folder,
    Image,
    Video,
    /// Anything that is neither a folder nor a known image/video.
    File,
}

impl MediaKind {
    /// Classifies a physical entry by directory-ness, then by extension (case-insensitive).
    pub fn classify(path: &Path, is_dir: bool) -> Self {
        if is_dir {
            return MediaKind::Folder;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some(e) if IMAGE_EXTENSIONS.contains(e) => MediaKind::Image,
            Some(e) if VIDEO_EXTENSIONS.contains(e) => MediaKind::Video,
            _ => MediaKind::File,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaKind::Folder => "folder",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::File => "file",
        };
        f.write_str(s)
    }
}

/// The logical view of one physical entry. Built fresh on every listing, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub name: String,
    pub kind: MediaKind,
    pub logical_path: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
    pub is_trashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_logical_path: Option<String>,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Uuid>,
}

/// Durable sidecar entry for attributes the filesystem cannot tell us.
///
/// Serialized as `{id, owner, isFavorite?, isTrashed?, originalPath?}`; `key`
/// is an addition that older files simply lack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub id: String,
    pub owner: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_trashed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Uuid>,
}

impl MetadataRecord {
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            is_favorite: false,
            is_trashed: false,
            original_path: None,
            key: Some(Uuid::new_v4()),
        }
    }

    pub fn matches(&self, id: &str, owner: &str) -> bool {
        self.id == id && self.owner == owner
    }

    /// Whether this record belongs to an entry nested inside the folder `folder_id`.
    pub fn is_under(&self, folder_id: &str, owner: &str) -> bool {
        self.owner == owner
            && self
                .id
                .strip_prefix(folder_id)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Moves this record (or a descendant's) from under `old_id` to `new_id`.
    pub(crate) fn rebase(&mut self, old_id: &str, new_id: &str) {
        if self.id == old_id {
            self.id = new_id.to_string();
        } else if let Some(rest) = self.id.strip_prefix(old_id) {
            self.id = format!("{}{}", new_id, rest);
        }
    }

    pub(crate) fn apply(&mut self, patch: &RecordPatch) {
        if let Some(fav) = patch.is_favorite {
            self.is_favorite = fav;
        }
        if let Some(trashed) = patch.is_trashed {
            self.is_trashed = trashed;
        }
        if let Some(original) = &patch.original_path {
            self.original_path = original.clone();
        }
    }
}

/// A partial record for merge-upserts. `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub id: String,
    pub owner: String,
    pub is_favorite: Option<bool>,
    pub is_trashed: Option<bool>,
    /// `Some(None)` clears the stored path.
    pub original_path: Option<Option<String>>,
}

impl RecordPatch {
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            ..Default::default()
        }
    }

    pub fn favorite(mut self, value: bool) -> Self {
        self.is_favorite = Some(value);
        self
    }

    pub fn trashed(mut self, original_path: impl Into<String>) -> Self {
        self.is_trashed = Some(true);
        self.original_path = Some(Some(original_path.into()));
        self
    }

    pub fn restored(mut self) -> Self {
        self.is_trashed = Some(false);
        self.original_path = Some(None);
        self
    }

    pub(crate) fn into_record(self) -> MetadataRecord {
        let mut record = MetadataRecord::new(self.id.clone(), self.owner.clone());
        record.apply(&self);
        record
    }
}
