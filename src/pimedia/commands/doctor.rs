use crate::commands::helpers::entry_exists;
use crate::commands::CmdMessage;
use crate::enumerate::scan_trash;
use crate::error::Result;
use crate::model::{RecordPatch, ROOT_MARKER};
use crate::paths::{locate_item, Area, StorageLayout};
use crate::store::{merge_patch, MetadataStore, RecordBackend};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Disagreements between one owner's files and their records.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    /// Trash entries with no record: invisible in listings.
    pub orphaned_trash_entries: Vec<String>,
    /// Records whose id no longer resolves to anything on disk.
    pub stale_records: Vec<String>,
    /// Records flagged as trashed while their item sits in the live tree.
    pub mismatched_records: Vec<String>,
    pub fixed: bool,
    #[serde(skip)]
    pub messages: Vec<CmdMessage>,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_trash_entries.is_empty()
            && self.stale_records.is_empty()
            && self.mismatched_records.is_empty()
    }
}

/// Inspects one owner's storage. With `fix`, orphaned trash entries are adopted
/// (restorable to "My Files"), stale records are dropped and wrong trash flags
/// are cleared.
pub fn run<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    fix: bool,
) -> Result<DoctorReport> {
    let records = store.records_for(owner);
    let known: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut report = DoctorReport::default();

    for entry in scan_trash(layout, owner)? {
        if !known.contains(entry.id.as_str()) {
            report.orphaned_trash_entries.push(entry.id);
        }
    }

    for record in &records {
        match locate_item(layout, owner, &record.id) {
            Ok(location) if !entry_exists(&location.path) => {
                report.stale_records.push(record.id.clone())
            }
            Ok(location) if record.is_trashed && location.area == Area::Live => {
                report.mismatched_records.push(record.id.clone())
            }
            Ok(_) => {}
            Err(_) => report.stale_records.push(record.id.clone()),
        }
    }

    if report.is_clean() {
        report
            .messages
            .push(CmdMessage::success("No inconsistencies found."));
        return Ok(report);
    }

    warn!(
        owner,
        orphans = report.orphaned_trash_entries.len(),
        stale = report.stale_records.len(),
        mismatched = report.mismatched_records.len(),
        "storage inconsistencies found"
    );

    if fix {
        let applied = apply_fixes(layout, store, owner, &report)?;
        report.fixed = true;
        info!(owner, applied, "storage inconsistencies fixed");
    }

    let verb = if fix { "Fixed" } else { "Found" };
    report
        .messages
        .push(CmdMessage::warning(format!("{} inconsistencies:", verb)));
    if !report.orphaned_trash_entries.is_empty() {
        report.messages.push(CmdMessage::info(format!(
            "  - {} trash item(s) without a record{}",
            report.orphaned_trash_entries.len(),
            if fix { ", now restorable to My Files" } else { "" }
        )));
    }
    if !report.stale_records.is_empty() {
        report.messages.push(CmdMessage::info(format!(
            "  - {} record(s) pointing at missing items{}",
            report.stale_records.len(),
            if fix { ", removed" } else { "" }
        )));
    }
    if !report.mismatched_records.is_empty() {
        report.messages.push(CmdMessage::info(format!(
            "  - {} live item(s) flagged as trashed{}",
            report.mismatched_records.len(),
            if fix { ", flag cleared" } else { "" }
        )));
    }

    Ok(report)
}

/// Applies a report's fixes. Files may have moved since the scan, so each finding
/// is checked again under the store lock and skipped if it no longer holds.
/// Returns how many records were changed.
fn apply_fixes<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    report: &DoctorReport,
) -> Result<usize> {
    store.transact(|all| {
        let mut applied = 0;
        for id in &report.stale_records {
            let gone = match locate_item(layout, owner, id) {
                Ok(location) => !entry_exists(&location.path),
                Err(_) => true,
            };
            if gone {
                let before = all.len();
                all.retain(|r| !r.matches(id, owner));
                applied += before - all.len();
            }
        }
        for id in &report.orphaned_trash_entries {
            let still_orphaned = !all.iter().any(|r| r.matches(id, owner))
                && locate_item(layout, owner, id)
                    .is_ok_and(|l| l.area == Area::Trash && entry_exists(&l.path));
            if still_orphaned {
                merge_patch(all, &RecordPatch::new(id.clone(), owner).trashed(ROOT_MARKER));
                applied += 1;
            }
        }
        for id in &report.mismatched_records {
            let still_mismatched = all.iter().any(|r| r.matches(id, owner) && r.is_trashed)
                && locate_item(layout, owner, id)
                    .is_ok_and(|l| l.area == Area::Live && entry_exists(&l.path));
            if still_mismatched {
                merge_patch(all, &RecordPatch::new(id.clone(), owner).restored());
                applied += 1;
            }
        }
        applied
    })
}
