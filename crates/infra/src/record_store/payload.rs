//! Serialized form of the record list.
//!
//! Current layout: `{"version": 1, "records": [...]}`. A bare JSON array is
//! the unversioned layout written before the version tag existed; it is still
//! read, and records in it without an `id` get a fresh one.

use serde::Serialize;
use serde_json::Value as JsonValue;

use feedstock_stock::MovementRecord;

use super::r#trait::RecordStoreError;

/// Version written by this build.
pub const PAYLOAD_VERSION: u64 = 1;

#[derive(Serialize)]
struct VersionedPayload<'a> {
    version: u64,
    records: &'a [MovementRecord],
}

pub fn encode(records: &[MovementRecord]) -> Result<String, RecordStoreError> {
    serde_json::to_string_pretty(&VersionedPayload {
        version: PAYLOAD_VERSION,
        records,
    })
    .map_err(|e| RecordStoreError::Encode(e.to_string()))
}

pub fn decode(text: &str) -> Result<Vec<MovementRecord>, RecordStoreError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| RecordStoreError::Decode(e.to_string()))?;

    let records = match value {
        JsonValue::Array(_) => value,
        JsonValue::Object(mut obj) => {
            let version = obj
                .get("version")
                .and_then(JsonValue::as_u64)
                .ok_or_else(|| RecordStoreError::Decode("missing or invalid `version`".to_string()))?;
            if version == 0 || version > PAYLOAD_VERSION {
                return Err(RecordStoreError::UnsupportedVersion {
                    found: version,
                    supported: PAYLOAD_VERSION,
                });
            }
            obj.remove("records")
                .ok_or_else(|| RecordStoreError::Decode("missing `records`".to_string()))?
        }
        other => {
            return Err(RecordStoreError::Decode(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )));
        }
    };

    serde_json::from_value(records).map_err(|e| RecordStoreError::Decode(e.to_string()))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use feedstock_core::Entity;
    use feedstock_stock::{FoodType, Movement, Purpose, Quantity, Source};

    fn sample() -> Vec<MovementRecord> {
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        vec![
            MovementRecord::new(
                day,
                FoodType::Maize,
                Quantity::new(100.0).unwrap(),
                Movement::Incoming { source: Source::Parents },
                Some("first delivery".to_string()),
            ),
            MovementRecord::new(
                day,
                FoodType::Maize,
                Quantity::new(30.0).unwrap(),
                Movement::Outgoing { purpose: Purpose::Lunch },
                None,
            ),
        ]
    }

    #[test]
    fn round_trip_preserves_records() {
        let records = sample();
        let text = encode(&records).unwrap();
        assert_eq!(decode(&text).unwrap(), records);
    }

    #[test]
    fn encoded_payload_is_versioned() {
        let text = encode(&sample()).unwrap();
        let value: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], PAYLOAD_VERSION);
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["records"][1]["movementType"], "outgoing");
        assert!(value["records"][1].get("source").is_none());
    }

    #[test]
    fn reads_legacy_bare_array() {
        let text = r#"[
            {"date":"2024-04-01","foodType":"Rice","quantity":12,"movementType":"incoming","source":"Govt","purpose":"","notes":""},
            {"date":"2024-04-01","foodType":"Rice","quantity":12,"movementType":"incoming","source":"Govt","purpose":"","notes":""}
        ]"#;
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].same_fields(&records[1]));
        assert_ne!(records[0].id(), records[1].id());
    }

    #[test]
    fn empty_text_is_empty_list() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_future_version() {
        let err = decode(r#"{"version": 9, "records": []}"#).unwrap_err();
        assert!(matches!(err, RecordStoreError::UnsupportedVersion { found: 9, .. }));
        assert!(!err.is_corrupt_payload());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(RecordStoreError::Decode(_))));
        assert!(matches!(decode("42"), Err(RecordStoreError::Decode(_))));
        assert!(matches!(decode(r#"{"records": []}"#), Err(RecordStoreError::Decode(_))));
    }
}
