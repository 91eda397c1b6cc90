use crate::error::{MediaError, Result};
use crate::paths::{item_id, resolve, validate_name, StorageLayout};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use tracing::debug;
use uuid::Uuid;

/// Streams `content` into `name` inside the folder at `logical_path`, creating the
/// folder if needed, and returns the new item's id.
///
/// The bytes land in a temp file in the staging dir and are renamed into place, so
/// listings never see a half-written file. An existing file of the same name is
/// replaced; an existing folder is not.
pub fn run<R: Read>(
    layout: &StorageLayout,
    owner: &str,
    logical_path: &str,
    name: &str,
    content: &mut R,
) -> Result<String> {
    validate_name(name)?;
    let dir = resolve(layout, owner, logical_path)?;
    fs::create_dir_all(&dir).map_err(MediaError::Io)?;

    let target = dir.join(name);
    if target.is_dir() {
        return Err(MediaError::AlreadyExists(format!(
            "{}/{} is a folder",
            logical_path, name
        )));
    }

    let staging = layout.staging_dir();
    fs::create_dir_all(&staging).map_err(MediaError::Io)?;
    let tmp_path = staging.join(format!("{}-{}.tmp", owner, Uuid::new_v4()));
    let written = File::create(&tmp_path).and_then(|mut file| {
        let bytes = io::copy(content, &mut file)?;
        file.flush()?;
        Ok(bytes)
    });
    let bytes = match written.and_then(|bytes| fs::rename(&tmp_path, &target).map(|_| bytes)) {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(MediaError::Io(e));
        }
    };

    debug!(owner, path = %target.display(), bytes, "file stored");
    item_id(layout, owner, &target)
}
