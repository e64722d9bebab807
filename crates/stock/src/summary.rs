//! Dashboard summary: stock per food and the alerts that go with it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::{FoodType, MovementRecord, MovementType};

/// Alert raised for a food's current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAlert {
    /// More went out than ever came in.
    Negative,
    /// At or above zero but under the low-stock threshold.
    Low,
}

impl core::fmt::Display for StockAlert {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockAlert::Negative => f.pad("negative stock"),
            StockAlert::Low => f.pad("low stock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSummary {
    pub food_type: FoodType,
    pub balance: f64,
    pub total_in: f64,
    pub total_out: f64,
    pub movements: usize,
    pub alert: Option<StockAlert>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub foods: Vec<FoodSummary>,
    pub total_records: usize,
    pub last_movement: Option<NaiveDate>,
}

impl StockSummary {
    pub fn food(&self, food_type: FoodType) -> Option<&FoodSummary> {
        self.foods.iter().find(|f| f.food_type == food_type)
    }

    pub fn alerts(&self) -> impl Iterator<Item = (FoodType, StockAlert)> + '_ {
        self.foods
            .iter()
            .filter_map(|f| f.alert.map(|a| (f.food_type, a)))
    }
}

/// Summarize `records`; foods under `low_stock_threshold` kg get a `Low` alert.
pub fn summarize(records: &[MovementRecord], low_stock_threshold: f64) -> StockSummary {
    let foods = FoodType::ALL
        .iter()
        .map(|&food_type| {
            let mut summary = FoodSummary {
                food_type,
                balance: 0.0,
                total_in: 0.0,
                total_out: 0.0,
                movements: 0,
                alert: None,
            };
            for r in records.iter().filter(|r| r.food_type() == food_type) {
                let kg = r.quantity().kilograms();
                match r.movement_type() {
                    MovementType::Incoming => summary.total_in += kg,
                    MovementType::Outgoing => summary.total_out += kg,
                }
                summary.movements += 1;
            }
            summary.balance = summary.total_in - summary.total_out;
            summary.alert = alert_for(summary.balance, low_stock_threshold);
            summary
        })
        .collect();

    StockSummary {
        foods,
        total_records: records.len(),
        last_movement: records.iter().map(MovementRecord::date).max(),
    }
}

fn alert_for(balance: f64, low_stock_threshold: f64) -> Option<StockAlert> {
    if balance < 0.0 {
        Some(StockAlert::Negative)
    } else if balance < low_stock_threshold {
        Some(StockAlert::Low)
    } else {
        None
    }
}
