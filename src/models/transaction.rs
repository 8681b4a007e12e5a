//! Transaction and subscription models
//!
//! A transaction is a single dated charge on a card. A subscription is a
//! flat monthly charge with no date that counts toward every billing cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{SubscriptionId, TransactionId};
use super::lenient;
use super::money::Money;
use super::now_millis;

/// A single charge recorded against a card
///
/// Transactions are immutable once created; the only change allowed is
/// removing them from the card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "lenient::id")]
    pub id: TransactionId,

    /// Positive charge amount
    #[serde(deserialize_with = "lenient::or_default")]
    pub amount: Money,

    /// When the charge was recorded
    #[serde(
        serialize_with = "chrono::serde::ts_milliseconds::serialize",
        deserialize_with = "lenient::timestamp_millis"
    )]
    pub date: DateTime<Utc>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction stamped with the current time
    pub fn new(amount: Money, description: Option<String>) -> Self {
        Self::at(amount, description, now_millis())
    }

    /// Create a new transaction with an explicit timestamp
    pub fn at(amount: Money, description: Option<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            date,
            description,
        }
    }

    /// Description to show, empty when none was recorded
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.label())
    }
}

/// A recurring monthly charge such as a streaming service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscription {
    #[serde(deserialize_with = "lenient::id")]
    pub id: SubscriptionId,

    /// Service name (e.g., "Netflix")
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,

    /// Monthly fee
    #[serde(deserialize_with = "lenient::or_default")]
    pub amount: Money,
}

impl Subscription {
    /// Create a new subscription
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: SubscriptionId::new(),
            name: name.into(),
            amount,
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/month)", self.name, self.amount)
    }
}
