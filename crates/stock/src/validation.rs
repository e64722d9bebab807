//! Per-row validation of pending entry rows.
//!
//! Every row is checked independently against the batch direction; there are
//! no cross-row checks (the same food may appear twice in one submission).

use std::collections::BTreeMap;

use crate::pending::PendingRow;
use crate::record::{FoodType, Movement, MovementType, Purpose, Quantity, Source};

/// Form field a validation message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FoodType,
    Quantity,
    Source,
    Purpose,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FoodType => "foodType",
            Field::Quantity => "quantity",
            Field::Source => "source",
            Field::Purpose => "purpose",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field → message for one row. Empty means the row is valid.
pub type RowErrors = BTreeMap<Field, &'static str>;

pub const FOOD_TYPE_REQUIRED: &str = "Food type is required";
pub const FOOD_TYPE_UNKNOWN: &str = "Unknown food type";
pub const QUANTITY_REQUIRED: &str = "Quantity is required";
pub const QUANTITY_NOT_POSITIVE: &str = "Quantity must be a number greater than 0";
pub const SOURCE_REQUIRED: &str = "Source is required";
pub const SOURCE_UNKNOWN: &str = "Unknown source";
pub const PURPOSE_REQUIRED: &str = "Purpose is required";
pub const PURPOSE_UNKNOWN: &str = "Unknown purpose";

/// A row that passed validation, resolved into typed values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CheckedRow {
    pub food_type: FoodType,
    pub quantity: Quantity,
    pub movement: Movement,
    pub notes: Option<String>,
}

/// Validation outcome for a whole batch, parallel to its rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    rows: Vec<RowErrors>,
}

impl ValidationReport {
    pub fn new(rows: Vec<RowErrors>) -> Self {
        Self { rows }
    }

    /// True iff every row's error map is empty.
    pub fn is_valid(&self) -> bool {
        self.rows.iter().all(BTreeMap::is_empty)
    }

    pub fn rows(&self) -> &[RowErrors] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&RowErrors> {
        self.rows.get(index)
    }

    /// `(row index, errors)` for rows with at least one error.
    pub fn invalid_rows(&self) -> impl Iterator<Item = (usize, &RowErrors)> {
        self.rows.iter().enumerate().filter(|(_, e)| !e.is_empty())
    }

    pub fn error_count(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }
}

impl core::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (index, errors) in self.invalid_rows() {
            for (field, message) in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "row {}: {}: {}", index + 1, field, message)?;
                first = false;
            }
        }
        if first {
            f.write_str("no errors")?;
        }
        Ok(())
    }
}

/// Validate one row against the batch direction.
pub fn validate_row(row: &PendingRow, movement_type: MovementType) -> RowErrors {
    check_row(row, movement_type).err().unwrap_or_default()
}

/// Validate every row independently.
pub fn validate_rows(rows: &[PendingRow], movement_type: MovementType) -> ValidationReport {
    ValidationReport::new(rows.iter().map(|r| validate_row(r, movement_type)).collect())
}

/// Resolve a row into typed values, or collect every field error it has.
pub(crate) fn check_row(
    row: &PendingRow,
    movement_type: MovementType,
) -> Result<CheckedRow, RowErrors> {
    let mut errors = RowErrors::new();

    let food_type = required_choice::<FoodType>(
        &row.food_type,
        Field::FoodType,
        FOOD_TYPE_REQUIRED,
        FOOD_TYPE_UNKNOWN,
        &mut errors,
    );

    let quantity = if row.quantity.trim().is_empty() {
        errors.insert(Field::Quantity, QUANTITY_REQUIRED);
        None
    } else {
        match Quantity::parse(&row.quantity) {
            Ok(q) => Some(q),
            Err(_) => {
                errors.insert(Field::Quantity, QUANTITY_NOT_POSITIVE);
                None
            }
        }
    };

    let movement = match movement_type {
        MovementType::Incoming => required_choice::<Source>(
            &row.source,
            Field::Source,
            SOURCE_REQUIRED,
            SOURCE_UNKNOWN,
            &mut errors,
        )
        .map(|source| Movement::Incoming { source }),
        MovementType::Outgoing => required_choice::<Purpose>(
            &row.purpose,
            Field::Purpose,
            PURPOSE_REQUIRED,
            PURPOSE_UNKNOWN,
            &mut errors,
        )
        .map(|purpose| Movement::Outgoing { purpose }),
    };

    match (food_type, quantity, movement) {
        (Some(food_type), Some(quantity), Some(movement)) if errors.is_empty() => Ok(CheckedRow {
            food_type,
            quantity,
            movement,
            notes: Some(row.notes.clone()).filter(|n| !n.trim().is_empty()),
        }),
        _ => Err(errors),
    }
}

fn required_choice<T: core::str::FromStr>(
    raw: &str,
    field: Field,
    required: &'static str,
    unknown: &'static str,
    errors: &mut RowErrors,
) -> Option<T> {
    if raw.trim().is_empty() {
        errors.insert(field, required);
        return None;
    }
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.insert(field, unknown);
            None
        }
    }
}
