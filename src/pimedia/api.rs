//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry
//! point for every caller (the bundled CLI, an HTTP layer, a UI), regardless of
//! how they present results.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns** the storage layout and the metadata store, so callers never wire them up
//! - **Dispatches** to the matching command
//! - **Returns structured types** (`Result<T>`, [`BatchResult`])
//!
//! It does not authenticate. Every method takes an `owner` that the caller has
//! already authorized.
//!
//! ## Sharing
//!
//! All methods take `&self`. The metadata store serializes its own writes, so one
//! `MediaLibrary` can be put in an `Arc` and used from every request thread.
//!
//! ## Generic Over RecordBackend
//!
//! `MediaLibrary<B: RecordBackend>`:
//! - Production: `MediaLibrary<JsonFileBackend>` (the default)
//! - Testing: `MediaLibrary<MemBackend>` or any custom backend

use crate::commands;
use crate::config::MediaConfig;
use crate::enumerate;
use crate::error::Result;
use crate::model::MediaItem;
use crate::paths::{self, StorageLayout};
use crate::store::{JsonFileBackend, MetadataStore, RecordBackend};
use std::io::Read;
use std::path::PathBuf;

pub struct MediaLibrary<B: RecordBackend = JsonFileBackend> {
    layout: StorageLayout,
    store: MetadataStore<B>,
}

impl MediaLibrary<JsonFileBackend> {
    /// Opens the library described by `layout`, creating its directories and
    /// metadata file if needed.
    pub fn open(layout: StorageLayout) -> Result<Self> {
        commands::init::run(&layout)?;
        let store = MetadataStore::open(layout.metadata_file());
        Ok(Self { layout, store })
    }

    pub fn from_config(config: &MediaConfig) -> Result<Self> {
        Self::open(config.layout()?)
    }
}

impl<B: RecordBackend> MediaLibrary<B> {
    /// Uses `backend` for metadata instead of the layout's metadata file.
    /// Directories are created, the metadata file is left alone.
    pub fn with_backend(layout: StorageLayout, backend: B) -> Result<Self> {
        commands::init::run(&layout)?;
        Ok(Self {
            layout,
            store: MetadataStore::with_backend(backend),
        })
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn store(&self) -> &MetadataStore<B> {
        &self.store
    }

    pub fn init(&self) -> Result<Vec<CmdMessage>> {
        commands::init::run(&self.layout)
    }

    pub fn list(&self, owner: &str) -> Result<Vec<MediaItem>> {
        enumerate::list(&self.layout, &self.store, owner)
    }

    pub fn create_folder(
        &self,
        owner: &str,
        parent_logical_path: &str,
        name: &str,
    ) -> Result<String> {
        commands::create_folder::run(&self.layout, owner, parent_logical_path, name)
    }

    pub fn upload<R: Read>(
        &self,
        owner: &str,
        logical_path: &str,
        name: &str,
        content: &mut R,
    ) -> Result<String> {
        commands::upload::run(&self.layout, owner, logical_path, name, content)
    }

    pub fn move_to_trash<I: AsRef<str>>(&self, owner: &str, ids: &[I]) -> BatchResult {
        commands::trash::run(&self.layout, &self.store, owner, ids)
    }

    pub fn restore<I: AsRef<str>>(&self, owner: &str, ids: &[I]) -> BatchResult {
        commands::restore::run(&self.layout, &self.store, owner, ids)
    }

    pub fn permanent_delete<I: AsRef<str>>(&self, owner: &str, ids: &[I]) -> BatchResult {
        commands::purge::run(&self.layout, &self.store, owner, ids)
    }

    pub fn toggle_favorite<I: AsRef<str>>(&self, owner: &str, ids: &[I]) -> BatchResult {
        commands::favorite::toggle(&self.layout, &self.store, owner, ids)
    }

    pub fn doctor(&self, owner: &str, fix: bool) -> Result<commands::doctor::DoctorReport> {
        commands::doctor::run(&self.layout, &self.store, owner, fix)
    }

    /// Physical file behind `(owner, logical_path, name)`, for streaming.
    pub fn locate(&self, owner: &str, logical_path: &str, name: &str) -> Result<PathBuf> {
        commands::locate::run(&self.layout, owner, logical_path, name)
    }

    /// Physical directory behind a logical path.
    pub fn resolve(&self, owner: &str, logical_path: &str) -> Result<PathBuf> {
        paths::resolve(&self.layout, owner, logical_path)
    }
}

pub use crate::commands::doctor::DoctorReport;
pub use crate::commands::{BatchResult, Change, CmdMessage, ItemResult, MessageLevel};
