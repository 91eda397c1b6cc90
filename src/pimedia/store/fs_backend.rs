use super::backend::RecordBackend;
use crate::error::{MediaError, Result};
use crate::model::MetadataRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores the records as a pretty-printed JSON array in a single file.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl RecordBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<Vec<MetadataRecord>>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MediaError::Io(e)),
        };
        let records: Vec<MetadataRecord> =
            serde_json::from_slice(&content).map_err(MediaError::Serialization)?;
        Ok(Some(records))
    }

    fn save(&self, records: &[MetadataRecord]) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(MediaError::Io)?;

        let content = serde_json::to_string_pretty(records).map_err(MediaError::Serialization)?;

        // Atomic write: readers see either the old or the new document
        let tmp_file = dir.join(format!(".metadata-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(MediaError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(MediaError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join(".metadata.json"));
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join(".metadata.json"));
        let records = vec![MetadataRecord::new("a.jpg", "alice")];
        backend.save(&records).unwrap();
        assert_eq!(backend.load().unwrap(), Some(records));
    }

    #[test]
    fn save_leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join(".metadata.json"));
        backend
            .save(&[MetadataRecord::new("a.jpg", "alice")])
            .unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn corrupt_file_is_an_error_here() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".metadata.json");
        fs::write(&path, "[{\"id\": ").unwrap();
        let backend = JsonFileBackend::new(path);
        assert!(matches!(
            backend.load(),
            Err(MediaError::Serialization(_))
        ));
    }

    #[test]
    fn reads_files_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".metadata.json");
        fs::write(
            &path,
            r#"[
  {"id": "../.trash/alice/beach.jpg", "owner": "alice", "isFavorite": true,
   "isTrashed": true, "originalPath": "My Files/Trip"}
]"#,
        )
        .unwrap();
        let records = JsonFileBackend::new(path).load().unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_trashed);
        assert_eq!(records[0].original_path.as_deref(), Some("My Files/Trip"));
    }
}
