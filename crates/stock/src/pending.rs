//! Pending entry rows: the editable, not-yet-validated side of the form.

use chrono::NaiveDate;

use crate::record::{MovementRecord, MovementType};
use crate::validation::{ValidationReport, check_row, validate_rows};

/// One in-progress entry row, as free text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingRow {
    pub food_type: String,
    pub quantity: String,
    pub source: String,
    pub purpose: String,
    pub notes: String,
}

impl PendingRow {
    pub fn new(food_type: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            food_type: food_type.into(),
            quantity: quantity.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn is_blank(&self) -> bool {
        [&self.food_type, &self.quantity, &self.source, &self.purpose, &self.notes]
            .iter()
            .all(|s| s.trim().is_empty())
    }
}

/// The rows being edited plus the direction they share.
///
/// Never empty: it starts with one blank row and removing the last row leaves
/// a blank one in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBatch {
    movement_type: MovementType,
    rows: Vec<PendingRow>,
}

impl PendingBatch {
    pub fn new(movement_type: MovementType) -> Self {
        Self {
            movement_type,
            rows: vec![PendingRow::default()],
        }
    }

    /// Batch pre-filled with the given rows (a blank row if `rows` is empty).
    pub fn with_rows(movement_type: MovementType, rows: Vec<PendingRow>) -> Self {
        let mut batch = Self { movement_type, rows };
        if batch.rows.is_empty() {
            batch.rows.push(PendingRow::default());
        }
        batch
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn set_movement_type(&mut self, movement_type: MovementType) {
        self.movement_type = movement_type;
    }

    pub fn rows(&self) -> &[PendingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no row has anything typed into it.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(PendingRow::is_blank)
    }

    /// Append a blank row and return its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(PendingRow::default());
        self.rows.len() - 1
    }

    pub fn push_row(&mut self, row: PendingRow) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut PendingRow> {
        self.rows.get_mut(index)
    }

    pub fn remove_row(&mut self, index: usize) -> Option<PendingRow> {
        if index >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(index);
        if self.rows.is_empty() {
            self.rows.push(PendingRow::default());
        }
        Some(removed)
    }

    /// Back to a single blank row; the direction is kept.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.rows.push(PendingRow::default());
    }

    pub fn validate(&self) -> ValidationReport {
        validate_rows(&self.rows, self.movement_type)
    }

    /// Convert every row into a record dated `date`, in row order.
    ///
    /// All-or-nothing: any invalid row yields the full report instead.
    pub fn to_records(&self, date: NaiveDate) -> Result<Vec<MovementRecord>, ValidationReport> {
        let checked: Result<Vec<_>, _> = self
            .rows
            .iter()
            .map(|r| check_row(r, self.movement_type))
            .collect();

        match checked {
            Ok(rows) => Ok(rows
                .into_iter()
                .map(|r| MovementRecord::new(date, r.food_type, r.quantity, r.movement, r.notes))
                .collect()),
            Err(_) => Err(self.validate()),
        }
    }
}

impl Default for PendingBatch {
    fn default() -> Self {
        Self::new(MovementType::Incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FoodType, Movement, Purpose, Source};
    use crate::validation::Field;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn starts_with_one_blank_row() {
        let batch = PendingBatch::new(MovementType::Outgoing);
        assert_eq!(batch.len(), 1);
        assert!(batch.rows()[0].is_blank());
        assert!(batch.is_blank());
    }

    #[test]
    fn removing_last_row_leaves_a_blank_one() {
        let mut batch = PendingBatch::new(MovementType::Incoming);
        batch.row_mut(0).unwrap().food_type = "Rice".to_string();
        let removed = batch.remove_row(0).unwrap();
        assert_eq!(removed.food_type, "Rice");
        assert_eq!(batch.len(), 1);
        assert!(batch.rows()[0].is_blank());
        assert!(batch.remove_row(5).is_none());
    }

    #[test]
    fn add_and_reset() {
        let mut batch = PendingBatch::default();
        assert_eq!(batch.add_row(), 1);
        assert_eq!(batch.push_row(PendingRow::new("Maize", "3")), 2);
        batch.set_movement_type(MovementType::Outgoing);
        batch.reset();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.movement_type(), MovementType::Outgoing);
    }

    #[test]
    fn converts_valid_rows_in_order() {
        let batch = PendingBatch::with_rows(
            MovementType::Incoming,
            vec![
                PendingRow::new("Maize", "100").with_source("Parents").with_purpose("Lunch"),
                PendingRow::new("beans", "2.5").with_source("harvest").with_notes(" dry "),
            ],
        );
        let records = batch.to_records(day()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].food_type(), FoodType::Maize);
        assert_eq!(records[0].movement(), Movement::Incoming { source: Source::Parents });
        assert_eq!(records[0].purpose(), None);
        assert_eq!(records[1].food_type(), FoodType::Beans);
        assert_eq!(records[1].quantity().kilograms(), 2.5);
        assert_eq!(records[1].notes(), Some(" dry "));
        assert!(records.iter().all(|r| r.date() == day()));
    }

    #[test]
    fn invalid_row_rejects_whole_batch() {
        let batch = PendingBatch::with_rows(
            MovementType::Outgoing,
            vec![
                PendingRow::new("Rice", "4").with_purpose("Lunch"),
                PendingRow::new("Rice", "4"),
            ],
        );
        let report = batch.to_records(day()).unwrap_err();
        assert!(report.row(0).unwrap().is_empty());
        assert!(report.row(1).unwrap().contains_key(&Field::Purpose));
    }

    #[test]
    fn outgoing_conversion_ignores_source() {
        let batch = PendingBatch::with_rows(
            MovementType::Outgoing,
            vec![PendingRow::new("Maize", "30").with_source("Govt").with_purpose("Transfer")],
        );
        let records = batch.to_records(day()).unwrap();
        assert_eq!(records[0].movement(), Movement::Outgoing { purpose: Purpose::Transfer });
        assert_eq!(records[0].source(), None);
    }
}
