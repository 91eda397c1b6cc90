use super::backend::RecordBackend;
use crate::error::{MediaError, Result};
use crate::model::MetadataRecord;
use parking_lot::Mutex;
use serde::de::Error as _;

/// In-memory backend for tests.
///
/// Uses a `Mutex` rather than `RefCell` because [`RecordBackend`] must be `Sync`:
/// the library is shared between request threads.
#[derive(Default)]
pub struct MemBackend {
    records: Mutex<Option<Vec<MetadataRecord>>>,
    simulate_corruption: Mutex<bool>,
    simulate_read_error: Mutex<bool>,
    simulate_write_error: Mutex<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<MetadataRecord>) -> Self {
        let backend = Self::default();
        *backend.records.lock() = Some(records);
        backend
    }

    /// Make `load` fail as if the document could not be parsed.
    pub fn set_simulate_corruption(&self, simulate: bool) {
        *self.simulate_corruption.lock() = simulate;
    }

    /// Make `load` fail as if the file could not be read at all.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.lock() = simulate;
    }

    /// Make `save` fail as if the disk were full.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.lock() = simulate;
    }

    /// Direct view of what was last saved.
    pub fn snapshot(&self) -> Vec<MetadataRecord> {
        self.records.lock().clone().unwrap_or_default()
    }
}

impl RecordBackend for MemBackend {
    fn load(&self) -> Result<Option<Vec<MetadataRecord>>> {
        if *self.simulate_corruption.lock() {
            return Err(MediaError::Serialization(serde_json::Error::custom(
                "simulated corruption",
            )));
        }
        if *self.simulate_read_error.lock() {
            return Err(MediaError::Io(std::io::Error::other("simulated read error")));
        }
        Ok(self.records.lock().clone())
    }

    fn save(&self, records: &[MetadataRecord]) -> Result<()> {
        if *self.simulate_write_error.lock() {
            return Err(MediaError::Io(std::io::Error::other("simulated write error")));
        }
        *self.records.lock() = Some(records.to_vec());
        Ok(())
    }
}
