use crate::commands::CmdMessage;
use crate::error::{MediaError, Result};
use crate::paths::StorageLayout;
use std::fs;
use std::io::ErrorKind;
use tracing::info;

/// Makes sure the storage dir, the trash dir and the metadata file exist.
/// Safe to call any number of times; existing content is never touched.
pub fn run(layout: &StorageLayout) -> Result<Vec<CmdMessage>> {
    let mut messages = Vec::new();

    for dir in [layout.storage_dir(), layout.trash_dir()] {
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(MediaError::Io)?;
            messages.push(CmdMessage::success(format!("Created {}", dir.display())));
        }
    }

    let metadata_file = layout.metadata_file();
    if let Some(parent) = metadata_file.parent() {
        fs::create_dir_all(parent).map_err(MediaError::Io)?;
    }
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(metadata_file)
    {
        Ok(_) => {
            fs::write(metadata_file, "[]").map_err(MediaError::Io)?;
            messages.push(CmdMessage::success(format!(
                "Created {}",
                metadata_file.display()
            )));
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
        Err(e) => return Err(MediaError::Io(e)),
    }

    if messages.is_empty() {
        messages.push(CmdMessage::info(format!(
            "Storage already initialized at {}",
            layout.storage_dir().display()
        )));
    } else {
        info!(storage = %layout.storage_dir().display(), "storage initialized");
    }
    Ok(messages)
}
