//! Card model
//!
//! A credit card with its billing-cycle days, descriptive details, and the
//! transactions and subscriptions charged to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::ids::{CardId, SubscriptionId, TransactionId};
use super::lenient;
use super::money::Money;
use super::now_millis;
use super::transaction::{Subscription, Transaction};

/// Longest card name accepted
pub const MAX_NAME_LEN: usize = 100;

/// Card payment network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardNetwork {
    #[serde(rename = "VISA")]
    Visa,
    Mastercard,
    #[serde(rename = "JCB")]
    Jcb,
    #[serde(rename = "American Express")]
    AmericanExpress,
    Other,
}

impl CardNetwork {
    /// Parse a network from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "master" | "mc" => Some(Self::Mastercard),
            "jcb" => Some(Self::Jcb),
            "american express" | "american_express" | "amex" => Some(Self::AmericanExpress),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visa => write!(f, "VISA"),
            Self::Mastercard => write!(f, "Mastercard"),
            Self::Jcb => write!(f, "JCB"),
            Self::AmericanExpress => write!(f, "American Express"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Color theme used when the card face is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    #[default]
    Slate,
    Blue,
    Emerald,
    Rose,
    Amber,
    Indigo,
    Purple,
}

impl CardTheme {
    pub const ALL: [CardTheme; 7] = [
        Self::Slate,
        Self::Blue,
        Self::Emerald,
        Self::Rose,
        Self::Amber,
        Self::Indigo,
        Self::Purple,
    ];

    /// Parse a theme from user input
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.to_string() == s)
    }
}

impl fmt::Display for CardTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Slate => "slate",
            Self::Blue => "blue",
            Self::Emerald => "emerald",
            Self::Rose => "rose",
            Self::Amber => "amber",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
        };
        write!(f, "{}", name)
    }
}

/// A credit card
///
/// Every field defaults when absent or wrongly typed so collections written
/// by older versions, or hand-edited backups, still load. Keys this version
/// does not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier within the collection
    #[serde(deserialize_with = "lenient::id")]
    pub id: CardId,

    /// Card name (e.g., "Travel Rewards")
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,

    /// Issuing bank
    #[serde(deserialize_with = "lenient::or_default")]
    pub bank_name: String,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub network: Option<CardNetwork>,

    /// Expiry as `MM/YY`
    #[serde(deserialize_with = "lenient::or_default")]
    pub expiry_date: String,

    /// Day of month the statement closes (1-31)
    #[serde(deserialize_with = "lenient::or_default")]
    pub statement_date: u32,

    /// Day of month payment is due (1-31)
    #[serde(deserialize_with = "lenient::or_default")]
    pub due_date: u32,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub credit_limit: Option<Money>,

    #[serde(deserialize_with = "lenient::or_default")]
    pub rewards_info: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub reward_cap: String,

    /// Comma or whitespace separated list of channels the rewards apply to
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub applicable_channels: Option<String>,

    #[serde(deserialize_with = "lenient::or_default")]
    pub annual_fee_condition: String,

    #[serde(deserialize_with = "lenient::or_default")]
    pub theme: CardTheme,

    /// Custom card face as a `data:` URL
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::or_default"
    )]
    pub background_image: Option<String>,

    #[serde(
        serialize_with = "chrono::serde::ts_milliseconds::serialize",
        deserialize_with = "lenient::timestamp_millis"
    )]
    pub created_at: DateTime<Utc>,

    /// Charges in the order they were recorded
    #[serde(deserialize_with = "lenient::entries")]
    pub transactions: Vec<Transaction>,

    #[serde(deserialize_with = "lenient::entries")]
    pub subscriptions: Vec<Subscription>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Create a new card with a fresh id and creation time
    pub fn new(
        name: impl Into<String>,
        bank_name: impl Into<String>,
        statement_date: u32,
        due_date: u32,
    ) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            bank_name: bank_name.into(),
            statement_date,
            due_date,
            created_at: now_millis(),
            ..Self::default()
        }
    }

    /// Tags derived from `applicable_channels`
    pub fn channel_tags(&self) -> Vec<&str> {
        self.applicable_channels
            .as_deref()
            .map(|channels| {
                channels
                    .split(|c: char| c == ',' || c == '、' || c.is_whitespace())
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sum of all monthly subscription fees
    pub fn subscription_total(&self) -> Money {
        self.subscriptions.iter().map(|s| s.amount).sum()
    }

    /// Find a transaction by full id or id prefix
    pub fn find_transaction(&self, input: &str) -> Option<&Transaction> {
        let exact = TransactionId::from(input.trim());
        self.transactions
            .iter()
            .find(|t| t.id == exact)
            .or_else(|| unique_match(self.transactions.iter(), |t| t.id.matches(input)))
    }

    /// Find a subscription by id, id prefix, or name (case-insensitive)
    pub fn find_subscription(&self, input: &str) -> Option<&Subscription> {
        let exact = SubscriptionId::from(input.trim());
        let lower = input.trim().to_lowercase();
        self.subscriptions
            .iter()
            .find(|s| s.id == exact || s.name.to_lowercase() == lower)
            .or_else(|| unique_match(self.subscriptions.iter(), |s| s.id.matches(input)))
    }

    /// Validate the card
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }

        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(CardValidationError::NameTooLong(self.name.chars().count()));
        }

        if !(1..=31).contains(&self.statement_date) {
            return Err(CardValidationError::DayOutOfRange {
                field: "statement date",
                day: self.statement_date,
            });
        }

        if !(1..=31).contains(&self.due_date) {
            return Err(CardValidationError::DayOutOfRange {
                field: "due date",
                day: self.due_date,
            });
        }

        if !self.expiry_date.is_empty() && !is_valid_expiry(&self.expiry_date) {
            return Err(CardValidationError::InvalidExpiry(self.expiry_date.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bank_name.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.bank_name)
        }
    }
}

/// Return the only item matching `pred`, or None if zero or several match
fn unique_match<'a, T, I, F>(items: I, pred: F) -> Option<&'a T>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> bool,
{
    let mut matches = items.filter(|item| pred(item));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// `MM/YY` with a month of 01-12
fn is_valid_expiry(s: &str) -> bool {
    let Some((month, year)) = s.split_once('/') else {
        return false;
    };

    month.len() == 2
        && year.len() == 2
        && year.chars().all(|c| c.is_ascii_digit())
        && month
            .parse::<u32>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false)
}

/// Validation errors for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NameTooLong(usize),
    DayOutOfRange { field: &'static str, day: u32 },
    InvalidExpiry(String),
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Card name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::DayOutOfRange { field, day } => {
                write!(f, "The {} must be between 1 and 31 (got {})", field, day)
            }
            Self::InvalidExpiry(s) => write!(f, "Expiry must look like MM/YY (got '{}')", s),
        }
    }
}

impl std::error::Error for CardValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card() {
        let card = Card::new("Travel Rewards", "First Bank", 5, 20);
        assert_eq!(card.name, "Travel Rewards");
        assert_eq!(card.statement_date, 5);
        assert_eq!(card.due_date, 20);
        assert_eq!(card.theme, CardTheme::Slate);
        assert!(card.transactions.is_empty());
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut card = Card::new("Valid", "Bank", 5, 20);

        card.statement_date = 0;
        assert!(matches!(
            card.validate(),
            Err(CardValidationError::DayOutOfRange { field: "statement date", .. })
        ));

        card.statement_date = 31;
        card.due_date = 32;
        assert!(matches!(
            card.validate(),
            Err(CardValidationError::DayOutOfRange { field: "due date", .. })
        ));

        card.due_date = 31;
        card.expiry_date = "13/27".into();
        assert_eq!(
            card.validate(),
            Err(CardValidationError::InvalidExpiry("13/27".into()))
        );

        card.expiry_date = "09/27".into();
        assert!(card.validate().is_ok());

        card.name = "   ".into();
        assert_eq!(card.validate(), Err(CardValidationError::EmptyName));

        card.name = "a".repeat(101);
        assert!(matches!(
            card.validate(),
            Err(CardValidationError::NameTooLong(101))
        ));
    }

    #[test]
    fn test_channel_tags() {
        let mut card = Card::new("Online", "Bank", 1, 15);
        assert!(card.channel_tags().is_empty());

        card.applicable_channels = Some("Amazon, Uber、Netflix\nSteam  ,".into());
        assert_eq!(card.channel_tags(), vec!["Amazon", "Uber", "Netflix", "Steam"]);
    }

    #[test]
    fn test_subscription_total() {
        let mut card = Card::new("Streaming", "Bank", 1, 15);
        card.subscriptions.push(Subscription::new("Netflix", Money::new(390)));
        card.subscriptions.push(Subscription::new("Spotify", Money::new(149)));
        assert_eq!(card.subscription_total(), Money::new(539));
    }

    #[test]
    fn test_find_transaction_by_prefix() {
        let mut card = Card::new("Daily", "Bank", 1, 15);
        let mut a = Transaction::new(Money::new(10), None);
        a.id = TransactionId::from("abc111");
        let mut b = Transaction::new(Money::new(20), None);
        b.id = TransactionId::from("abd222");
        card.transactions = vec![a, b];

        assert_eq!(card.find_transaction("abc").unwrap().amount, Money::new(10));
        assert_eq!(card.find_transaction("txn-abd").unwrap().amount, Money::new(20));
        // ambiguous prefix
        assert!(card.find_transaction("ab").is_none());
    }

    #[test]
    fn test_network_wire_names() {
        let json = serde_json::to_string(&CardNetwork::AmericanExpress).unwrap();
        assert_eq!(json, "\"American Express\"");
        let parsed: CardNetwork = serde_json::from_str("\"VISA\"").unwrap();
        assert_eq!(parsed, CardNetwork::Visa);
        assert_eq!(CardNetwork::parse("amex"), Some(CardNetwork::AmericanExpress));
        assert_eq!(CardNetwork::parse("discover"), None);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(CardTheme::parse("Emerald"), Some(CardTheme::Emerald));
        assert_eq!(CardTheme::parse("gold"), None);
    }

    #[test]
    fn test_subscription_total_saturates() {
        let mut card = Card::new("Imported", "Bank", 1, 15);
        card.subscriptions.push(Subscription::new("Huge", Money::new(i64::MAX)));
        card.subscriptions.push(Subscription::new("One", Money::new(1)));
        assert_eq!(card.subscription_total(), Money::new(i64::MAX));
    }

    #[test]
    fn test_wrongly_typed_fields_fall_back() {
        let json = r#"{
            "id": 1700000000000,
            "name": "Odd",
            "statementDate": "five",
            "dueDate": 20,
            "network": "Discover",
            "creditLimit": "lots",
            "theme": 3,
            "createdAt": "yesterday",
            "transactions": [{"id": "t1", "amount": 120, "date": 1728543600000}, 7],
            "subscriptions": "none"
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id.as_str(), "1700000000000");
        assert_eq!(card.name, "Odd");
        assert_eq!(card.statement_date, 0);
        assert_eq!(card.due_date, 20);
        assert!(card.network.is_none());
        assert!(card.credit_limit.is_none());
        assert_eq!(card.theme, CardTheme::Slate);
        assert_eq!(card.created_at.timestamp_millis(), 0);
        assert_eq!(card.transactions.len(), 1);
        assert_eq!(card.transactions[0].amount, Money::new(120));
        assert!(card.subscriptions.is_empty());
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let json = r#"{"id": "c1", "name": "Keep", "pinned": true, "notes": {"a": 1}}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.extra.get("pinned"), Some(&Value::Bool(true)));

        let written = serde_json::to_value(&card).unwrap();
        assert_eq!(written["pinned"], Value::Bool(true));
        assert_eq!(written["notes"], serde_json::json!({"a": 1}));
        assert_eq!(written["name"], "Keep");
        assert!(written.get("extra").is_none());
    }

    #[test]
    fn test_loads_sparse_legacy_record() {
        let json = r#"{
            "id": "k3j9x2a",
            "name": "Cashback",
            "bankName": "Metro Bank",
            "expiryDate": "08/28",
            "statementDate": 5,
            "dueDate": 20,
            "rewardsInfo": "",
            "rewardCap": "",
            "annualFeeCondition": "",
            "theme": "rose",
            "createdAt": 1700000000000
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id.as_str(), "k3j9x2a");
        assert_eq!(card.theme, CardTheme::Rose);
        assert!(card.network.is_none());
        assert!(card.transactions.is_empty());
        assert!(card.subscriptions.is_empty());
        assert_eq!(card.created_at.timestamp_millis(), 1_700_000_000_000);
    }
}
