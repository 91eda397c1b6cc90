//! # Pimedia Architecture
//!
//! Pimedia is a **multi-tenant media storage library**. It presents a logical view
//! (folders, files, favorites, trash) over a plain directory tree per owner, and keeps
//! a JSON metadata sidecar in sync with every filesystem mutation. The bundled
//! `pimedia` binary is one client of it; an HTTP layer or a UI would be others.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - MediaLibrary facade, shareable across threads            │
//! │  - Returns structured Result / BatchResult types            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, enumerate.rs)                │
//! │  - Filesystem moves coordinated with record updates         │
//! │  - Per-item outcomes for batch operations                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (paths.rs, store/)                           │
//! │  - Logical path <-> physical path resolution                │
//! │  - MetadataStore over a RecordBackend (JSON file, memory)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifiers
//!
//! An item's id is its path relative to the owner's live root, `/`-separated. Items in
//! the trash keep that convention, so their ids walk out of the live root
//! (`../.trash/alice/beach.jpg`). Ids change on every move: callers must use the id
//! returned by the last operation (see [`commands::Change::new_id`]).
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against a temp dir ([`test_utils`]).
//! 2. **Store** (`store/`): unit tests against [`store::MemBackend`].
//! 3. **Integration** (`tests/`): lifecycle scenarios, concurrency and the CLI.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: The item lifecycle, one module per operation
//! - [`enumerate`]: Listing an owner's live tree and trash
//! - [`paths`]: Storage layout and path resolution
//! - [`store`]: Metadata sidecar and its backends
//! - [`model`]: Core data types (`MediaItem`, `MetadataRecord`, `MediaKind`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod paths;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
