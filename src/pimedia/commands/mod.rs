//! # Command Layer
//!
//! The lifecycle of a media item, one operation per submodule. Each operation
//! coordinates a filesystem step with a metadata step:
//!
//! ```text
//! Live ──trash──▶ Trashed ──restore──▶ Live
//! Live ──purge──▶ Gone
//! Trashed ──purge──▶ Gone
//! (Live|Trashed) ──favorite──▶ (same state, flag flipped)
//! ```
//!
//! ## Batches
//!
//! Batch operations never abort on the first bad id. Each id is processed on its
//! own and ends up as an [`ItemResult`]; a failure in one item does not stop the
//! next. There is no rollback across items: a batch interrupted halfway leaves the
//! processed prefix in its new state.
//!
//! Commands return structured results and messages. They never print; the UI
//! layer decides how to render them.
//!
//! ## Command Modules
//!
//! - [`init`]: Create the storage dirs and the metadata file
//! - [`create_folder`]: Create a folder in the live tree
//! - [`upload`]: Store an incoming file in the live tree
//! - [`trash`]: Move items to the owner's trash
//! - [`restore`]: Move trashed items back where they came from
//! - [`purge`]: Permanently delete items
//! - [`favorite`]: Toggle the favorite flag
//! - [`doctor`]: Find and fix sidecar/filesystem disagreements
//! - [`locate`]: Resolve a media file for the serving layer
//! - [`helpers`]: Shared moves and record re-keying

use crate::error::{MediaError, Result};
use serde::Serialize;
use std::collections::HashSet;

pub mod create_folder;
pub mod doctor;
pub mod favorite;
pub mod helpers;
pub mod init;
pub mod locate;
pub mod purge;
pub mod restore;
pub mod trash;
pub mod upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What happened to one item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum Change {
    #[serde(rename_all = "camelCase")]
    Trashed { new_id: String, original_path: String },
    #[serde(rename_all = "camelCase")]
    Restored { new_id: String, logical_path: String },
    Deleted,
    #[serde(rename_all = "camelCase")]
    Favorite { is_favorite: bool },
    /// Nothing to do for this id (e.g. restoring an item that was never trashed).
    Unchanged,
}

impl Change {
    /// The id the caller must use from now on, when it changed.
    pub fn new_id(&self) -> Option<&str> {
        match self {
            Change::Trashed { new_id, .. } | Change::Restored { new_id, .. } => Some(new_id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ItemResult {
    pub id: String,
    pub outcome: Result<Change>,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub items: Vec<ItemResult>,
    pub messages: Vec<CmdMessage>,
}

impl BatchResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Ok(change) => Some((item.id.as_str(), change)),
            Err(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &MediaError)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Ok(_) => None,
            Err(e) => Some((item.id.as_str(), e)),
        })
    }

    pub fn outcome(&self, id: &str) -> Option<&Result<Change>> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| &item.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Runs `step` once per distinct id, in first-seen order, recording a message per item.
/// `verb` and `done` phrase the messages ("trash" / "Trashed").
pub(crate) fn run_batch<I, F>(ids: &[I], verb: &str, done: &str, mut step: F) -> BatchResult
where
    I: AsRef<str>,
    F: FnMut(&str) -> Result<Change>,
{
    let mut result = BatchResult::default();
    let mut seen = HashSet::new();

    for id in ids.iter().map(AsRef::as_ref) {
        if !seen.insert(id) {
            continue;
        }
        let outcome = step(id);
        let message = match &outcome {
            Ok(Change::Unchanged) => CmdMessage::info(format!("Nothing to {}: {}", verb, id)),
            Ok(_) => CmdMessage::success(format!("{}: {}", done, id)),
            Err(e) => CmdMessage::error(format!("Could not {} {}: {}", verb, id, e)),
        };
        result.add_message(message);
        result.items.push(ItemResult {
            id: id.to_string(),
            outcome,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_deduplicates_and_keeps_order() {
        let mut calls = Vec::new();
        let result = run_batch(&["b", "a", "b"], "trash", "Trashed", |id| {
            calls.push(id.to_string());
            Ok(Change::Deleted)
        });
        assert_eq!(calls, vec!["b", "a"]);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].id, "b");
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let result = run_batch(&["bad", "good"], "delete", "Deleted", |id| {
            if id == "bad" {
                Err(MediaError::NotFound(id.to_string()))
            } else {
                Ok(Change::Deleted)
            }
        });
        assert!(result.has_failures());
        assert_eq!(result.succeeded().count(), 1);
        assert!(matches!(
            result.outcome("bad"),
            Some(Err(MediaError::NotFound(_)))
        ));
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert_eq!(result.messages[1].level, MessageLevel::Success);
        assert_eq!(result.messages[1].content, "Deleted: good");
    }

    #[test]
    fn change_exposes_new_ids() {
        let change = Change::Trashed {
            new_id: "../.trash/alice/a.jpg".into(),
            original_path: "My Files".into(),
        };
        assert_eq!(change.new_id(), Some("../.trash/alice/a.jpg"));
        assert_eq!(Change::Deleted.new_id(), None);
    }
}
