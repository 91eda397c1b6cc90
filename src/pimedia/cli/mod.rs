//! # CLI Behavior
//!
//! This is **one possible UI client** for pimedia, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the library docs.
//!
//! ## Owners
//!
//! Every command except `init` works on one owner's storage, named with `--owner`.
//! The CLI performs no authentication: whoever runs it may act as any owner.
//!
//! ## Ids
//!
//! `ls` prints each item's id. Ids change when items move, so run `ls` again (or
//! read the `->` hint printed by `trash` and `restore`) before the next command.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting (listings, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
