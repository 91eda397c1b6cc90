use crate::error::{MediaError, Result};
use crate::paths::{item_id, resolve, validate_name, StorageLayout};
use std::fs;
use std::io::ErrorKind;
use tracing::debug;

/// Creates `name` inside the folder at `parent_logical_path`, along with any missing
/// ancestors. Creating a folder that already exists is not an error.
///
/// Returns the id of the folder. No record is written: a new folder is in the
/// default state.
pub fn run(
    layout: &StorageLayout,
    owner: &str,
    parent_logical_path: &str,
    name: &str,
) -> Result<String> {
    validate_name(name)?;
    let parent = resolve(layout, owner, parent_logical_path)?;
    let target = parent.join(name);

    match fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(MediaError::AlreadyExists(format!(
                "{}/{} is a file",
                parent_logical_path, name
            )))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(&target).map_err(MediaError::Io)?;
            debug!(owner, path = %target.display(), "folder created");
        }
        Err(e) => return Err(MediaError::Io(e)),
    }

    item_id(layout, owner, &target)
}
