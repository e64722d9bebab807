use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use feedstock_core::{DomainError, DomainResult, Entity, RecordId, ValueObject};

/// Implements the closed-vocabulary helpers shared by the record enums:
/// `ALL`, `as_str`, `Display` and a case-insensitive, whitespace-tolerant `FromStr`.
macro_rules! impl_choice {
    ($t:ident, $what:literal, [$($variant:ident => $label:literal),+ $(,)?]) => {
        impl $t {
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($t::$variant => $label),+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl core::str::FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::validation(format!("unknown {}: {:?}", $what, wanted)))
            }
        }

        impl ValueObject for $t {}
    };
}

/// Food kept in the school store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FoodType {
    Maize,
    Beans,
    Rice,
}

impl_choice!(FoodType, "food type", [Maize => "Maize", Beans => "Beans", Rice => "Rice"]);

/// Where incoming food came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Parents,
    Govt,
    Harvest,
}

impl_choice!(Source, "source", [Parents => "Parents", Govt => "Govt", Harvest => "Harvest"]);

/// What outgoing food was used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    Lunch,
    Transfer,
}

impl_choice!(Purpose, "purpose", [Lunch => "Lunch", Transfer => "Transfer"]);

/// Direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Incoming,
    Outgoing,
}

impl_choice!(MovementType, "movement type", [Incoming => "incoming", Outgoing => "outgoing"]);

impl MovementType {
    /// +1 for stock coming in, -1 for stock going out.
    pub fn sign(self) -> f64 {
        match self {
            MovementType::Incoming => 1.0,
            MovementType::Outgoing => -1.0,
        }
    }
}

/// Positive, finite quantity in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Quantity(f64);

impl Quantity {
    pub fn new(kilograms: f64) -> DomainResult<Self> {
        if !kilograms.is_finite() || kilograms <= 0.0 {
            return Err(DomainError::validation(format!(
                "quantity must be a finite number greater than 0 (got {kilograms})"
            )));
        }
        Ok(Self(kilograms))
    }

    /// Parse free text (as typed into a form field).
    pub fn parse(text: &str) -> DomainResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("quantity is required"));
        }
        let kilograms: f64 = text
            .parse()
            .map_err(|_| DomainError::validation(format!("quantity is not a number: {text:?}")))?;
        Self::new(kilograms)
    }

    pub fn kilograms(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Quantity {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Quantity {}

/// Direction plus the detail that belongs to it.
///
/// Incoming movements always carry a source and never a purpose; outgoing
/// movements the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Incoming { source: Source },
    Outgoing { purpose: Purpose },
}

impl Movement {
    pub fn movement_type(&self) -> MovementType {
        match self {
            Movement::Incoming { .. } => MovementType::Incoming,
            Movement::Outgoing { .. } => MovementType::Outgoing,
        }
    }

    pub fn source(&self) -> Option<Source> {
        match self {
            Movement::Incoming { source } => Some(*source),
            Movement::Outgoing { .. } => None,
        }
    }

    pub fn purpose(&self) -> Option<Purpose> {
        match self {
            Movement::Incoming { .. } => None,
            Movement::Outgoing { purpose } => Some(*purpose),
        }
    }
}

/// One committed stock movement. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr", into = "RecordRepr")]
pub struct MovementRecord {
    id: RecordId,
    date: NaiveDate,
    food_type: FoodType,
    quantity: Quantity,
    movement: Movement,
    notes: Option<String>,
}

impl MovementRecord {
    /// Create a record with a freshly generated id.
    pub fn new(
        date: NaiveDate,
        food_type: FoodType,
        quantity: Quantity,
        movement: Movement,
        notes: Option<String>,
    ) -> Self {
        Self::with_id(RecordId::new(), date, food_type, quantity, movement, notes)
    }

    pub fn with_id(
        id: RecordId,
        date: NaiveDate,
        food_type: FoodType,
        quantity: Quantity,
        movement: Movement,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            date,
            food_type,
            quantity,
            movement,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn food_type(&self) -> FoodType {
        self.food_type
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement.movement_type()
    }

    pub fn source(&self) -> Option<Source> {
        self.movement.source()
    }

    pub fn purpose(&self) -> Option<Purpose> {
        self.movement.purpose()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Quantity with the movement's sign applied (kilograms).
    pub fn signed_quantity(&self) -> f64 {
        self.movement_type().sign() * self.quantity.kilograms()
    }

    /// True when every field except the id matches.
    pub fn same_fields(&self, other: &MovementRecord) -> bool {
        self.date == other.date
            && self.food_type == other.food_type
            && self.quantity == other.quantity
            && self.movement == other.movement
            && self.notes == other.notes
    }
}

impl Entity for MovementRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Flat persisted layout: `movementType` plus optional `source`/`purpose`.
///
/// Also accepts the unversioned layout written before ids existed: a missing
/// `id` gets a fresh one, blank `source`/`purpose`/`notes` strings read as
/// absent and a quantity may arrive as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr {
    #[serde(default)]
    id: Option<RecordId>,
    date: NaiveDate,
    food_type: FoodType,
    #[serde(deserialize_with = "number_or_text")]
    quantity: Quantity,
    movement_type: MovementType,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    purpose: Option<Purpose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl TryFrom<RecordRepr> for MovementRecord {
    type Error = DomainError;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        let movement = match (repr.movement_type, repr.source, repr.purpose) {
            (MovementType::Incoming, Some(source), None) => Movement::Incoming { source },
            (MovementType::Outgoing, None, Some(purpose)) => Movement::Outgoing { purpose },
            (MovementType::Incoming, _, _) => {
                return Err(DomainError::invariant(
                    "incoming record must carry a source and no purpose",
                ));
            }
            (MovementType::Outgoing, _, _) => {
                return Err(DomainError::invariant(
                    "outgoing record must carry a purpose and no source",
                ));
            }
        };

        Ok(MovementRecord::with_id(
            repr.id.unwrap_or_default(),
            repr.date,
            repr.food_type,
            repr.quantity,
            movement,
            repr.notes,
        ))
    }
}

impl From<MovementRecord> for RecordRepr {
    fn from(record: MovementRecord) -> Self {
        Self {
            id: Some(record.id),
            date: record.date,
            food_type: record.food_type,
            quantity: record.quantity,
            movement_type: record.movement.movement_type(),
            source: record.movement.source(),
            purpose: record.movement.purpose(),
            notes: record.notes,
        }
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(text) if !text.trim().is_empty() => {
            text.parse().map(Some).map_err(serde::de::Error::custom)
        }
        _ => Ok(None),
    }
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Quantity, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let quantity = match Raw::deserialize(deserializer)? {
        Raw::Number(kg) => Quantity::new(kg),
        Raw::Text(text) => Quantity::parse(&text),
    };
    quantity.map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn kg(v: f64) -> Quantity {
        Quantity::new(v).unwrap()
    }

    #[test]
    fn choices_parse_case_insensitively() {
        assert_eq!(" maize ".parse::<FoodType>().unwrap(), FoodType::Maize);
        assert_eq!("GOVT".parse::<Source>().unwrap(), Source::Govt);
        assert_eq!("transfer".parse::<Purpose>().unwrap(), Purpose::Transfer);
        assert_eq!("Outgoing".parse::<MovementType>().unwrap(), MovementType::Outgoing);
        assert!("Sorghum".parse::<FoodType>().is_err());
    }

    #[test]
    fn choices_honour_width_and_fill() {
        assert_eq!(format!("{:<6}|", FoodType::Rice), "Rice  |");
        assert_eq!(format!("{:>8}|", Source::Govt), "    Govt|");
        assert_eq!(format!("{:-^9}", Purpose::Lunch), "--Lunch--");
        assert_eq!(format!("{:<9}|", MovementType::Incoming), "incoming |");
    }

    #[test]
    fn quantity_rejects_non_positive_and_non_finite() {
        assert!(Quantity::new(0.0).is_err());
        assert!(Quantity::new(-1.0).is_err());
        assert!(Quantity::new(f64::NAN).is_err());
        assert!(Quantity::parse("inf").is_err());
        assert!(Quantity::parse("").is_err());
        assert!(Quantity::parse("ten").is_err());
        assert_eq!(Quantity::parse(" 12.5 ").unwrap().kilograms(), 12.5);
    }

    #[test]
    fn signed_quantity_follows_direction() {
        let incoming = MovementRecord::new(
            day(),
            FoodType::Maize,
            kg(100.0),
            Movement::Incoming { source: Source::Parents },
            None,
        );
        let outgoing = MovementRecord::new(
            day(),
            FoodType::Maize,
            kg(30.0),
            Movement::Outgoing { purpose: Purpose::Lunch },
            None,
        );
        assert_eq!(incoming.signed_quantity(), 100.0);
        assert_eq!(outgoing.signed_quantity(), -30.0);
    }

    #[test]
    fn blank_notes_are_dropped() {
        let r = MovementRecord::new(
            day(),
            FoodType::Rice,
            kg(1.0),
            Movement::Incoming { source: Source::Harvest },
            Some("   ".to_string()),
        );
        assert_eq!(r.notes(), None);
    }

    #[test]
    fn serializes_flat_camel_case_layout() {
        let id: RecordId = "00000000-0000-0000-0000-000000000000".parse().unwrap();
        let r = MovementRecord::with_id(
            id,
            day(),
            FoodType::Beans,
            kg(25.0),
            Movement::Outgoing { purpose: Purpose::Lunch },
            Some("week 11".to_string()),
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "date": "2024-03-14",
                "foodType": "Beans",
                "quantity": 25.0,
                "movementType": "outgoing",
                "purpose": "Lunch",
                "notes": "week 11",
            })
        );
    }

    #[test]
    fn reads_legacy_record_without_id() {
        let json = r#"{
            "date": "2024-03-14",
            "foodType": "Maize",
            "quantity": "100",
            "movementType": "incoming",
            "source": "Parents",
            "purpose": "",
            "notes": ""
        }"#;
        let r: MovementRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.food_type(), FoodType::Maize);
        assert_eq!(r.quantity().kilograms(), 100.0);
        assert_eq!(r.source(), Some(Source::Parents));
        assert_eq!(r.purpose(), None);
        assert_eq!(r.notes(), None);
    }

    #[test]
    fn rejects_record_with_mismatched_detail() {
        let json = r#"{
            "date": "2024-03-14",
            "foodType": "Maize",
            "quantity": 5,
            "movementType": "outgoing",
            "source": "Govt"
        }"#;
        assert!(serde_json::from_str::<MovementRecord>(json).is_err());
    }

    #[test]
    fn rejects_non_positive_quantity_on_read() {
        let json = r#"{
            "date": "2024-03-14",
            "foodType": "Rice",
            "quantity": 0,
            "movementType": "incoming",
            "source": "Govt"
        }"#;
        assert!(serde_json::from_str::<MovementRecord>(json).is_err());
    }
}
