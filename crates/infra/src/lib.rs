//! Infrastructure layer: persistence of the record list.

pub mod record_store;

pub use record_store::{
    CorruptDataPolicy, InMemoryRecordStore, JsonFileStore, PAYLOAD_VERSION, RecordStore,
    RecordStoreError, default_data_dir,
};
