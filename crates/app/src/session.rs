//! Entry session: the form workflow over one persisted record list.

use chrono::NaiveDate;
use thiserror::Error;

use feedstock_infra::{RecordStore, RecordStoreError};
use feedstock_stock::{
    FoodType, MovementRecord, PendingBatch, RecordFilter, StockLedger, StockSummary,
    ValidationReport, ViewEntry, balance_with_pending, summarize,
};

#[derive(Debug, Error)]
pub enum SessionError {
    /// At least one pending row has a field error; nothing was stored.
    #[error("submission rejected: {0}")]
    Rejected(ValidationReport),

    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

/// Owns the record list, the pending rows and the store they persist to.
///
/// Every mutation is saved before it becomes visible: if the save fails the
/// session keeps its previous records.
#[derive(Debug)]
pub struct EntrySession<S> {
    store: S,
    ledger: StockLedger,
    pending: PendingBatch,
}

impl<S: RecordStore> EntrySession<S> {
    /// Load the record list once and start with one blank pending row.
    pub fn open(store: S) -> Result<Self, SessionError> {
        let records = store.load()?;
        tracing::debug!(count = records.len(), "session opened");
        Ok(Self {
            store,
            ledger: StockLedger::from_records(records),
            pending: PendingBatch::default(),
        })
    }

    pub fn records(&self) -> &[MovementRecord] {
        self.ledger.records()
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn pending(&self) -> &PendingBatch {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingBatch {
        &mut self.pending
    }

    /// Validate the pending rows and commit them as records dated `today`.
    ///
    /// On rejection nothing changes (the rows stay for correction). On success
    /// the new records are returned and the pending rows reset to one blank row.
    pub fn submit(&mut self, today: NaiveDate) -> Result<Vec<MovementRecord>, SessionError> {
        let records = match self.pending.to_records(today) {
            Ok(records) => records,
            Err(report) => {
                tracing::info!(
                    rows = self.pending.len(),
                    errors = report.error_count(),
                    "submission rejected"
                );
                return Err(SessionError::Rejected(report));
            }
        };

        let mut next = self.ledger.clone();
        next.append(records.iter().cloned());
        self.store.save(next.records())?;

        self.ledger = next;
        self.pending.reset();
        tracing::info!(
            added = records.len(),
            movement_type = %self.pending.movement_type(),
            total = self.ledger.len(),
            "records submitted"
        );
        Ok(records)
    }

    /// Remove the record at `view_index` of the view for `filter`.
    ///
    /// `Ok(None)` when the index is outside the view; the store is not touched.
    pub fn undo(
        &mut self,
        filter: &RecordFilter,
        view_index: usize,
    ) -> Result<Option<MovementRecord>, SessionError> {
        let mut next = self.ledger.clone();
        let Some(removed) = next.undo(filter, view_index) else {
            tracing::debug!(view_index, "nothing to undo");
            return Ok(None);
        };

        self.store.save(next.records())?;
        self.ledger = next;
        tracing::info!(
            food_type = %removed.food_type(),
            kg = removed.quantity().kilograms(),
            total = self.ledger.len(),
            "record undone"
        );
        Ok(Some(removed))
    }

    pub fn view(&self, filter: &RecordFilter) -> Vec<ViewEntry<'_>> {
        self.ledger.view(filter)
    }

    pub fn balance(&self, food_type: FoodType) -> f64 {
        self.ledger.balance(food_type)
    }

    /// Balance as it would be if the pending rows were committed now.
    pub fn balance_with_pending(&self, food_type: FoodType) -> f64 {
        balance_with_pending(self.ledger.records(), food_type, &self.pending)
    }

    pub fn summary(&self, low_stock_threshold: f64) -> StockSummary {
        summarize(self.ledger.records(), low_stock_threshold)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
