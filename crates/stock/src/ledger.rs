//! The ordered record list and its mutations.

use feedstock_core::{Entity, RecordId};

use crate::balance;
use crate::filter::{RecordFilter, ViewEntry, filter_records};
use crate::record::{FoodType, MovementRecord};

/// Ordered list of committed movement records (oldest first).
///
/// Records are only ever appended or removed whole; they are never edited.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockLedger {
    records: Vec<MovementRecord>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<MovementRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MovementRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = MovementRecord>) {
        self.records.extend(records);
    }

    pub fn get(&self, id: &RecordId) -> Option<&MovementRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn balance(&self, food_type: FoodType) -> f64 {
        balance::balance(&self.records, food_type)
    }

    pub fn view(&self, filter: &RecordFilter) -> Vec<ViewEntry<'_>> {
        filter_records(&self.records, filter)
    }

    /// Remove the record shown at `view_index` of the view for `filter`.
    ///
    /// The view entry carries the record's position in the underlying list;
    /// removal happens only if the record there still has the same id, so two
    /// records with identical fields are never confused. Returns `None` (and
    /// changes nothing) when the index is outside the view.
    pub fn undo(&mut self, filter: &RecordFilter, view_index: usize) -> Option<MovementRecord> {
        let (position, id) = {
            let view = self.view(filter);
            let entry = view.get(view_index)?;
            (entry.position, *entry.record.id())
        };

        if self.records.get(position).map(Entity::id) != Some(&id) {
            return None;
        }
        Some(self.records.remove(position))
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<MovementRecord> {
        let position = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FoodFilter;
    use crate::record::{Movement, Purpose, Quantity, Source};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn incoming(food: FoodType, d: u32, kg: f64) -> MovementRecord {
        MovementRecord::new(
            day(d),
            food,
            Quantity::new(kg).unwrap(),
            Movement::Incoming { source: Source::Harvest },
            None,
        )
    }

    fn outgoing(food: FoodType, d: u32, kg: f64) -> MovementRecord {
        MovementRecord::new(
            day(d),
            food,
            Quantity::new(kg).unwrap(),
            Movement::Outgoing { purpose: Purpose::Lunch },
            None,
        )
    }

    #[test]
    fn undo_first_entry_removes_most_recent_match() {
        let mut ledger = StockLedger::from_records(vec![
            incoming(FoodType::Maize, 1, 100.0),
            outgoing(FoodType::Maize, 2, 30.0),
            incoming(FoodType::Rice, 2, 5.0),
        ]);
        let filter = RecordFilter::all().food(FoodFilter::Only(FoodType::Maize));

        let removed = ledger.undo(&filter, 0).unwrap();
        assert_eq!(removed.quantity().kilograms(), 30.0);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.balance(FoodType::Maize), 100.0);
        assert_eq!(ledger.balance(FoodType::Rice), 5.0);
    }

    #[test]
    fn undo_on_empty_view_is_noop() {
        let mut ledger = StockLedger::from_records(vec![incoming(FoodType::Maize, 1, 10.0)]);
        let filter = RecordFilter::all().food(FoodFilter::Only(FoodType::Beans));
        assert!(ledger.undo(&filter, 0).is_none());
        assert!(ledger.undo(&RecordFilter::all(), 7).is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn undo_distinguishes_field_identical_records() {
        let first = incoming(FoodType::Beans, 3, 12.0);
        let second = MovementRecord::new(
            first.date(),
            first.food_type(),
            first.quantity(),
            first.movement(),
            None,
        );
        assert!(first.same_fields(&second));

        let mut ledger = StockLedger::from_records(vec![
            first.clone(),
            incoming(FoodType::Rice, 3, 1.0),
            second.clone(),
        ]);

        // Index 1 of the Beans view is the older of the two identical records.
        let filter = RecordFilter::all().food(FoodFilter::Only(FoodType::Beans));
        let removed = ledger.undo(&filter, 1).unwrap();
        assert_eq!(removed.id(), first.id());
        assert!(ledger.get(second.id()).is_some());
        assert!(ledger.get(first.id()).is_none());
    }

    #[test]
    fn remove_by_id() {
        let r = incoming(FoodType::Maize, 1, 1.0);
        let mut ledger = StockLedger::new();
        ledger.append([r.clone()]);
        assert_eq!(ledger.remove(r.id()), Some(r.clone()));
        assert!(ledger.remove(r.id()).is_none());
        assert!(ledger.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: undoing the first view entry removes exactly one record
        /// and moves the balance by that record's signed quantity.
        #[test]
        fn undo_removes_exactly_one(
            specs in prop::collection::vec((any::<bool>(), 1u32..500u32), 1..15),
        ) {
            let records: Vec<_> = specs
                .iter()
                .map(|&(is_in, q)| {
                    if is_in {
                        incoming(FoodType::Maize, 1, f64::from(q))
                    } else {
                        outgoing(FoodType::Maize, 1, f64::from(q))
                    }
                })
                .collect();
            let mut ledger = StockLedger::from_records(records);
            let before = ledger.balance(FoodType::Maize);

            let removed = ledger.undo(&RecordFilter::all(), 0).unwrap();

            prop_assert_eq!(ledger.len(), specs.len() - 1);
            prop_assert_eq!(ledger.balance(FoodType::Maize), before - removed.signed_quantity());
        }
    }
}
