//! Forgiving field decoders for stored and imported records
//!
//! Backups may come from older versions or be edited by hand. A field whose
//! value has the wrong JSON type decodes to its default instead of rejecting
//! the whole record.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode the field, or fall back to `T::default()` on a type mismatch
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Identifier that may have been written as a string or a number
pub fn id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String> + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => T::from(s),
        Value::Number(n) => T::from(n.to_string()),
        _ => T::default(),
    })
}

/// Epoch milliseconds, integral or not; anything else is the epoch
pub fn timestamp_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(millis_from_value(&Value::deserialize(deserializer)?))
}

/// Shared with the backup envelope's `exportedAt`
pub fn millis_from_value(value: &Value) -> DateTime<Utc> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_default()
}

/// A list where unreadable entries are dropped and a non-list is empty
pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Record {
        #[serde(deserialize_with = "or_default")]
        day: u32,
        #[serde(deserialize_with = "id")]
        id: String,
        #[serde(deserialize_with = "timestamp_millis")]
        at: DateTime<Utc>,
        #[serde(deserialize_with = "entries")]
        items: Vec<u32>,
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let record: Record =
            serde_json::from_str(r#"{"day": "five", "id": 1700, "at": "soon", "items": [1, "x", 3]}"#)
                .unwrap();

        assert_eq!(record.day, 0);
        assert_eq!(record.id, "1700");
        assert_eq!(record.at.timestamp_millis(), 0);
        assert_eq!(record.items, vec![1, 3]);
    }

    #[test]
    fn test_good_values_kept() {
        let record: Record =
            serde_json::from_str(r#"{"day": 5, "id": "k3j", "at": 1728543600123.0, "items": {}}"#)
                .unwrap();

        assert_eq!(record.day, 5);
        assert_eq!(record.id, "k3j");
        assert_eq!(record.at.timestamp_millis(), 1_728_543_600_123);
        assert!(record.items.is_empty());
    }
}
