//! Stock balance derivation.
//!
//! A balance is the signed sum of a food's incoming minus outgoing kilograms.
//! It is not clamped and can go negative.

use crate::pending::PendingBatch;
use crate::record::{FoodType, MovementRecord, Quantity};

/// Balance of `food_type` over committed records.
pub fn balance(records: &[MovementRecord], food_type: FoodType) -> f64 {
    records
        .iter()
        .filter(|r| r.food_type() == food_type)
        .map(MovementRecord::signed_quantity)
        .sum()
}

/// What the pending rows would add to `food_type` if committed now.
///
/// Rows whose food or quantity does not resolve yet contribute nothing.
pub fn pending_delta(pending: &PendingBatch, food_type: FoodType) -> f64 {
    let sign = pending.movement_type().sign();
    pending
        .rows()
        .iter()
        .filter(|row| row.food_type.parse::<FoodType>().ok() == Some(food_type))
        .filter_map(|row| Quantity::parse(&row.quantity).ok())
        .map(|q| sign * q.kilograms())
        .sum()
}

/// Committed balance plus the in-progress rows.
pub fn balance_with_pending(
    records: &[MovementRecord],
    food_type: FoodType,
    pending: &PendingBatch,
) -> f64 {
    balance(records, food_type) + pending_delta(pending, food_type)
}

/// Balance of every food type, in declaration order.
pub fn balances(records: &[MovementRecord]) -> Vec<(FoodType, f64)> {
    FoodType::ALL
        .iter()
        .map(|&food_type| (food_type, balance(records, food_type)))
        .collect()
}
