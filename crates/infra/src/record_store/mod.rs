//! Record store boundary.
//!
//! The whole record list lives in one key/value slot. It is read whole at
//! startup and written whole after every mutation; there is no incremental
//! append.

pub mod in_memory;
pub mod json_file;
pub mod payload;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use json_file::{CorruptDataPolicy, JsonFileStore, default_data_dir};
pub use payload::PAYLOAD_VERSION;
pub use r#trait::{RecordStore, RecordStoreError};
