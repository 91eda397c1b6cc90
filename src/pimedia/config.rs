//! # Configuration
//!
//! Configuration is managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `PIMEDIA_STORAGE_DIR`, `PIMEDIA_TRASH_DIR`, `PIMEDIA_METADATA_FILE`.
//! 2. **Config file**: `pimedia.toml` in the OS config dir (via `directories`), or `--config`.
//! 3. **Defaults**: storage in the OS data dir, trash and metadata file inside it.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_dir` | `<data dir>/pimedia` | Parent of every owner's live tree |
//! | `trash_dir` | `<storage_dir>/.trash` | Parent of every owner's trash |
//! | `metadata_file` | `<storage_dir>/.metadata.json` | The metadata sidecar |

use crate::error::{MediaError, Result};
use crate::paths::{StorageLayout, DEFAULT_METADATA_FILE, DEFAULT_TRASH_DIR};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pimedia.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaConfig {
    /// Directory holding one live tree per owner.
    #[config(env = "PIMEDIA_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Directory holding one flat trash per owner.
    #[config(env = "PIMEDIA_TRASH_DIR")]
    pub trash_dir: Option<PathBuf>,

    /// JSON file holding the metadata records of all owners.
    #[config(env = "PIMEDIA_METADATA_FILE")]
    pub metadata_file: Option<PathBuf>,
}

impl MediaConfig {
    /// Loads env vars, then `file` (if it exists), falling back to the default config file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.map(Path::to_path_buf).or_else(default_config_file);
        let mut builder = MediaConfig::builder().env();
        if let Some(path) = file.filter(|p| p.exists()) {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| MediaError::Config(e.to_string()))
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_storage_dir(),
        }
    }

    pub fn trash_dir(&self) -> Result<PathBuf> {
        match &self.trash_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.storage_dir()?.join(DEFAULT_TRASH_DIR)),
        }
    }

    pub fn metadata_file(&self) -> Result<PathBuf> {
        match &self.metadata_file {
            Some(file) => Ok(file.clone()),
            None => Ok(self.storage_dir()?.join(DEFAULT_METADATA_FILE)),
        }
    }

    pub fn layout(&self) -> Result<StorageLayout> {
        StorageLayout::new(
            self.storage_dir()?,
            self.trash_dir()?,
            self.metadata_file()?,
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pimedia", "pimedia")
}

fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn default_storage_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MediaError::Config("could not determine a data directory".to_string()))
}
