use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use feedstock_stock::MovementRecord;

/// Record store operation error.
///
/// These are **infrastructure errors** (IO, encoding) as opposed to domain
/// errors (validation, invariants).
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("storage io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored records could not be decoded: {0}")]
    Decode(String),

    #[error("records could not be encoded: {0}")]
    Encode(String),

    #[error("unsupported payload version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("record slot lock poisoned")]
    LockPoisoned,
}

impl RecordStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the stored bytes exist but cannot be understood.
    /// `UnsupportedVersion` is not: a newer build can still read it.
    pub fn is_corrupt_payload(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Whole-list persistence for movement records.
///
/// `load` returns the records in stored order (an empty list when nothing has
/// been saved yet); `save` replaces the slot's content entirely.
pub trait RecordStore: Send + Sync {
    fn load(&self) -> Result<Vec<MovementRecord>, RecordStoreError>;

    fn save(&self, records: &[MovementRecord]) -> Result<(), RecordStoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn load(&self) -> Result<Vec<MovementRecord>, RecordStoreError> {
        (**self).load()
    }

    fn save(&self, records: &[MovementRecord]) -> Result<(), RecordStoreError> {
        (**self).save(records)
    }
}
