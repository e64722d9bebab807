//! Food stock domain module.
//!
//! Movement records, pending entry rows and their validation, balance
//! derivation, filtering, undo and the dashboard summary. Implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod balance;
pub mod filter;
pub mod ledger;
pub mod pending;
pub mod record;
pub mod summary;
pub mod validation;

pub use balance::{balance, balance_with_pending, balances, pending_delta};
pub use filter::{FoodFilter, RecordFilter, ViewEntry, filter_records};
pub use ledger::StockLedger;
pub use pending::{PendingBatch, PendingRow};
pub use record::{
    FoodType, Movement, MovementRecord, MovementType, Purpose, Quantity, Source,
};
pub use summary::{FoodSummary, StockAlert, StockSummary, summarize};
pub use validation::{Field, RowErrors, ValidationReport, validate_row, validate_rows};
