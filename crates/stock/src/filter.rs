//! Filtered, most-recent-first views over the record list.

use chrono::NaiveDate;

use feedstock_core::DomainError;

use crate::record::{FoodType, MovementRecord};

/// Food-type part of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodFilter {
    #[default]
    All,
    Only(FoodType),
}

impl FoodFilter {
    pub fn matches(&self, food_type: FoodType) -> bool {
        match self {
            FoodFilter::All => true,
            FoodFilter::Only(wanted) => *wanted == food_type,
        }
    }
}

impl core::str::FromStr for FoodFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FoodFilter::All);
        }
        s.parse().map(FoodFilter::Only)
    }
}

impl core::fmt::Display for FoodFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FoodFilter::All => f.pad("All"),
            FoodFilter::Only(food_type) => core::fmt::Display::fmt(food_type, f),
        }
    }
}

/// Food type plus optional exact date. The default matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFilter {
    pub food: FoodFilter,
    pub date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn food(mut self, food: FoodFilter) -> Self {
        self.food = food;
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, record: &MovementRecord) -> bool {
        self.food.matches(record.food_type()) && self.date.is_none_or(|d| d == record.date())
    }
}

/// One entry of a filtered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEntry<'a> {
    /// Index of the record in the underlying (unfiltered) list.
    pub position: usize,
    pub record: &'a MovementRecord,
}

/// Records matching `filter`, most recently submitted first.
pub fn filter_records<'a>(
    records: &'a [MovementRecord],
    filter: &RecordFilter,
) -> Vec<ViewEntry<'a>> {
    records
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, r)| filter.matches(r))
        .map(|(position, record)| ViewEntry { position, record })
        .collect()
}
