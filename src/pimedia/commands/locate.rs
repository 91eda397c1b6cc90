use crate::error::{MediaError, Result};
use crate::paths::{resolve, validate_name, StorageLayout};
use std::path::PathBuf;

/// Resolves `(owner, logical_path, name)` to a regular file the serving layer may
/// stream. Uses the same resolution rule as every other operation.
pub fn run(
    layout: &StorageLayout,
    owner: &str,
    logical_path: &str,
    name: &str,
) -> Result<PathBuf> {
    validate_name(name)?;
    let path = resolve(layout, owner, logical_path)?.join(name);
    if !path.is_file() {
        return Err(MediaError::NotFound(format!("{}/{}", logical_path, name)));
    }
    Ok(path)
}
