//! Backup file codec
//!
//! A backup is a versioned JSON envelope around the full card collection:
//!
//! ```json
//! { "version": "1.0", "exportedAt": 1728543600123, "cards": [ ... ] }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WalletError, WalletResult};
use crate::models::lenient::millis_from_value;
use crate::models::Card;

/// Version tag written into new backups
pub const BACKUP_VERSION: &str = "1.0";

/// Versioned wrapper used for backup file exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub version: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,

    pub cards: Vec<Card>,

    /// Entries of `cards` that are not card objects, kept as found
    #[serde(skip)]
    pub unreadable: Vec<Value>,
}

impl BackupEnvelope {
    /// Wrap a collection in a new envelope
    pub fn new(cards: Vec<Card>, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            exported_at,
            cards,
            unreadable: Vec::new(),
        }
    }
}

/// Render the collection as an indented backup document
pub fn serialize(cards: &[Card], exported_at: DateTime<Utc>) -> WalletResult<String> {
    let envelope = BackupEnvelope::new(cards.to_vec(), exported_at);
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| WalletError::Json(format!("Failed to serialize backup: {}", e)))
}

/// Parse and check a backup document
///
/// Fails with [`WalletError::Parse`] when the text is not JSON and with
/// [`WalletError::Schema`] when it is not an object holding a `cards` array.
/// Individual cards are not validated: absent or wrongly typed fields take
/// their defaults, unknown fields are carried along, and entries that are
/// not objects end up in [`BackupEnvelope::unreadable`]. `version` and
/// `exportedAt` are taken as found.
pub fn deserialize(text: &str) -> WalletResult<BackupEnvelope> {
    let value: Value = serde_json::from_str(text).map_err(|e| WalletError::Parse(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| WalletError::Schema("top-level value is not an object".into()))?;

    let raw_cards = obj
        .get("cards")
        .and_then(Value::as_array)
        .ok_or_else(|| WalletError::Schema("missing `cards` array".into()))?;

    let mut cards = Vec::with_capacity(raw_cards.len());
    let mut unreadable = Vec::new();
    for raw in raw_cards {
        match raw.is_object().then(|| Card::deserialize(raw)) {
            Some(Ok(card)) => cards.push(card),
            _ => unreadable.push(raw.clone()),
        }
    }

    let version = match obj.get("version") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let exported_at = obj
        .get("exportedAt")
        .map(millis_from_value)
        .unwrap_or_default();

    Ok(BackupEnvelope {
        version,
        exported_at,
        cards,
        unreadable,
    })
}

/// Default file name for a backup exported on `date`
pub fn backup_filename(date: NaiveDate) -> String {
    format!("cardmanager_backup_{}.json", date.format("%Y%m%d"))
}
