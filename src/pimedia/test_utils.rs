use crate::paths::StorageLayout;
use crate::store::{JsonFileBackend, MetadataStore};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway storage dir with the default layout and a file-backed store.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub layout: StorageLayout,
    pub store: MetadataStore<JsonFileBackend>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let layout = StorageLayout::under(temp_dir.path()).expect("valid layout");
        let store = MetadataStore::open(layout.metadata_file());
        Self {
            _temp_dir: temp_dir,
            layout,
            store,
        }
    }

    pub fn live_path(&self, owner: &str, relative: &str) -> PathBuf {
        self.layout
            .owner_root(owner)
            .expect("valid owner")
            .join(relative)
    }

    pub fn trash_path(&self, owner: &str, relative: &str) -> PathBuf {
        self.layout
            .owner_trash(owner)
            .expect("valid owner")
            .join(relative)
    }

    /// Writes a file into the owner's live tree, creating parent folders.
    pub fn write_file(&self, owner: &str, relative: &str, content: &[u8]) -> PathBuf {
        write_with_parents(self.live_path(owner, relative), content)
    }

    /// Writes a file straight into the owner's trash, bypassing the sidecar.
    pub fn write_trash_file(&self, owner: &str, relative: &str, content: &[u8]) -> PathBuf {
        write_with_parents(self.trash_path(owner, relative), content)
    }
}

fn write_with_parents(path: PathBuf, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dirs");
    }
    fs::write(&path, content).expect("failed to write file");
    path
}
