use crate::error::Result;
use crate::model::MetadataRecord;

/// Raw persistence of the metadata document.
///
/// This trait handles the "how" of storage (file vs memory), while
/// [`super::MetadataStore`] handles the "what" (merging, locking, self-healing).
pub trait RecordBackend: Send + Sync {
    /// Read every record.
    /// Returns `Ok(None)` when nothing has been written yet.
    /// Returns `Err` for unreadable or unparseable documents.
    fn load(&self) -> Result<Option<Vec<MetadataRecord>>>;

    /// Replace the whole document.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save(&self, records: &[MetadataRecord]) -> Result<()>;
}
