//! # Path Resolution
//!
//! Pure mapping between the logical paths the UI shows ("My Files/Album") and the
//! physical locations under the storage dir, plus the identifier scheme.
//!
//! ## On-disk Layout
//!
//! ```text
//! <storage>/
//! ├── .metadata.json        # Metadata sidecar (JSON array of records)
//! ├── .uploads/             # Half-written uploads, never listed
//! ├── .trash/
//! │   └── <owner>/          # Flat trash: trashed items are direct children
//! └── <owner>/              # Live tree, "My Files" in the UI
//! ```
//!
//! Trash and metadata locations are configurable; the layout above is the default.
//!
//! ## Identifiers
//!
//! An item id is the `/`-separated path of the entry relative to the owner's *live*
//! root, even while the entry sits in the trash. A trashed `beach.jpg` therefore has
//! the id `../.trash/alice/beach.jpg`.
//!
//! Every path coming from a caller is normalized lexically (no filesystem access)
//! and checked against the owner's roots. `Path::join` alone does not stop `..`
//! from walking out of a root, so nothing here trusts it.

use crate::error::{MediaError, Result};
use crate::model::ROOT_MARKER;
use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_TRASH_DIR: &str = ".trash";
pub const DEFAULT_METADATA_FILE: &str = ".metadata.json";
pub const STAGING_DIR: &str = ".uploads";

/// Absolute locations of the storage dir, the trash dir and the metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    storage_dir: PathBuf,
    trash_dir: PathBuf,
    metadata_file: PathBuf,
}

impl StorageLayout {
    pub fn new(
        storage_dir: impl AsRef<Path>,
        trash_dir: impl AsRef<Path>,
        metadata_file: impl AsRef<Path>,
    ) -> Result<Self> {
        let storage_dir = normalize(storage_dir.as_ref())?;
        let trash_dir = normalize(trash_dir.as_ref())?;
        let metadata_file = normalize(metadata_file.as_ref())?;

        if trash_dir == storage_dir || storage_dir.starts_with(&trash_dir) {
            return Err(MediaError::Config(format!(
                "trash dir {} must not contain the storage dir",
                trash_dir.display()
            )));
        }
        if metadata_file.starts_with(&trash_dir) {
            return Err(MediaError::Config(
                "metadata file must live outside the trash dir".to_string(),
            ));
        }

        Ok(Self {
            storage_dir,
            trash_dir,
            metadata_file,
        })
    }

    /// Default layout: trash and metadata file both inside the storage dir.
    pub fn under(storage_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_dir = storage_dir.as_ref();
        Self::new(
            storage_dir,
            storage_dir.join(DEFAULT_TRASH_DIR),
            storage_dir.join(DEFAULT_METADATA_FILE),
        )
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    /// Where uploads are written before being renamed into an owner's tree. Same
    /// volume as the live trees, outside all of them.
    pub fn staging_dir(&self) -> PathBuf {
        self.storage_dir.join(STAGING_DIR)
    }

    /// The owner's live root. Does not create it.
    pub fn owner_root(&self, owner: &str) -> Result<PathBuf> {
        validate_owner(owner)?;
        let root = self.storage_dir.join(owner);
        if self.trash_dir.starts_with(&root) || self.metadata_file.starts_with(&root) {
            return Err(MediaError::InvalidPath(format!(
                "owner '{}' collides with a reserved storage path",
                owner
            )));
        }
        Ok(root)
    }

    /// The owner's trash root. Does not create it.
    pub fn owner_trash(&self, owner: &str) -> Result<PathBuf> {
        validate_owner(owner)?;
        Ok(self.trash_dir.join(owner))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Live,
    Trash,
}

/// Where an identifier points to, physically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocation {
    pub path: PathBuf,
    pub area: Area,
}

/// Owners are used as directory names, so they must be one plain path component.
/// A leading dot is refused so an owner can never alias `.trash` or `.metadata.json`.
pub fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty()
        || owner.starts_with('.')
        || owner.contains(['/', '\\', '\0'])
    {
        return Err(MediaError::InvalidPath(format!("invalid owner '{}'", owner)));
    }
    Ok(())
}

/// A file or folder name: exactly one normal component.
pub fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    if !single_normal || name.contains(['/', '\\', '\0']) {
        return Err(MediaError::InvalidPath(format!("invalid name '{}'", name)));
    }
    Ok(())
}

/// Maps a logical path to the physical directory it names.
///
/// `"My Files"` is the owner's root; `"My Files/a/b"` and `"a/b"` both map to
/// `<root>/a/b`. Anything that would land outside the root is refused.
pub fn resolve(layout: &StorageLayout, owner: &str, logical_path: &str) -> Result<PathBuf> {
    let root = layout.owner_root(owner)?;
    let remainder = strip_root_marker(logical_path);

    if remainder.contains('\0') || Path::new(remainder).has_root() {
        return Err(MediaError::InvalidPath(logical_path.to_string()));
    }

    let resolved = normalize(&root.join(remainder))?;
    if !resolved.starts_with(&root) {
        return Err(MediaError::InvalidPath(logical_path.to_string()));
    }
    Ok(resolved)
}

fn strip_root_marker(logical_path: &str) -> &str {
    match logical_path.strip_prefix(ROOT_MARKER) {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(inner) => inner,
            // "My Filesystem" is a folder name, not the marker
            None => logical_path,
        },
        None => logical_path,
    }
}

/// Inverse of [`resolve`] for directories in the live tree.
pub fn breadcrumb(layout: &StorageLayout, owner: &str, physical: &Path) -> Result<String> {
    let root = layout.owner_root(owner)?;
    let physical = normalize(physical)?;
    if physical == root {
        return Ok(ROOT_MARKER.to_string());
    }
    let relative = physical
        .strip_prefix(&root)
        .map_err(|_| MediaError::InvalidPath(physical.display().to_string()))?;
    Ok(format!("{}/{}", ROOT_MARKER, join_components(relative)?))
}

/// Computes the identifier of a physical entry in the owner's live tree or trash.
pub fn item_id(layout: &StorageLayout, owner: &str, physical: &Path) -> Result<String> {
    let root = layout.owner_root(owner)?;
    let trash = layout.owner_trash(owner)?;
    let physical = normalize(physical)?;

    if !strictly_inside(&physical, &root) && !strictly_inside(&physical, &trash) {
        return Err(MediaError::InvalidPath(format!(
            "{} is outside the storage of '{}'",
            physical.display(),
            owner
        )));
    }
    relative_id(&root, &physical)
}

/// Resolves an identifier back to a physical location.
///
/// Only ids that land strictly inside the owner's live root or trash root are
/// accepted; the roots themselves are not items.
pub fn locate_item(layout: &StorageLayout, owner: &str, id: &str) -> Result<ItemLocation> {
    let root = layout.owner_root(owner)?;
    let trash = layout.owner_trash(owner)?;

    if id.is_empty() || id.contains('\0') || Path::new(id).has_root() {
        return Err(MediaError::InvalidPath(format!("invalid id '{}'", id)));
    }

    let path = normalize(&root.join(id))?;
    if strictly_inside(&path, &root) {
        Ok(ItemLocation {
            path,
            area: Area::Live,
        })
    } else if strictly_inside(&path, &trash) {
        Ok(ItemLocation {
            path,
            area: Area::Trash,
        })
    } else {
        Err(MediaError::InvalidPath(format!(
            "id '{}' escapes the storage of '{}'",
            id, owner
        )))
    }
}

fn strictly_inside(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

/// Lexical normalization into an absolute path. Never touches the filesystem.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

fn relative_id(base: &Path, target: &Path) -> Result<String> {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); base.len() - common];
    for component in &target[common..] {
        parts.push(component_str(component)?.to_string());
    }
    Ok(parts.join("/"))
}

fn join_components(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|c| component_str(&c).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

fn component_str<'a>(component: &'a Component) -> Result<&'a str> {
    component.as_os_str().to_str().ok_or_else(|| {
        MediaError::InvalidPath(format!(
            "non UTF-8 path component {:?}",
            component.as_os_str()
        ))
    })
}
