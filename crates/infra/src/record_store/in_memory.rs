use std::sync::RwLock;

use feedstock_stock::MovementRecord;

use super::payload;
use super::r#trait::{RecordStore, RecordStoreError};

/// In-memory record slot.
///
/// Keeps the encoded payload rather than the records themselves, so a load
/// goes through the same decode path as the file store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    slot: RwLock<Option<String>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw slot content (e.g. a legacy or damaged payload).
    pub fn with_payload(text: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(text.into())),
        }
    }

    /// Current raw slot content.
    pub fn payload(&self) -> Option<String> {
        self.slot.read().ok().and_then(|s| s.clone())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn load(&self) -> Result<Vec<MovementRecord>, RecordStoreError> {
        let slot = self
            .slot
            .read()
            .map_err(|_| RecordStoreError::LockPoisoned)?;
        match slot.as_deref() {
            Some(text) => payload::decode(text),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[MovementRecord]) -> Result<(), RecordStoreError> {
        let text = payload::encode(records)?;
        let mut slot = self
            .slot
            .write()
            .map_err(|_| RecordStoreError::LockPoisoned)?;
        *slot = Some(text);
        Ok(())
    }
}
