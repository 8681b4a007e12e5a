//! Strongly-typed ID wrappers for all entity types
//!
//! IDs are opaque strings: fresh ones are random, but anything read from
//! storage or a backup file is accepted as-is so older data keeps its identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            /// Get the raw id string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form used in listings
            pub fn short(&self) -> String {
                let head: String = self.0.chars().take(8).collect();
                format!("{}{}", $display_prefix, head)
            }

            /// Check whether user input refers to this id
            ///
            /// Matches the full id, or a prefix of it with or without the
            /// display prefix.
            pub fn matches(&self, input: &str) -> bool {
                let input = input.trim();
                let bare = input.strip_prefix($display_prefix).unwrap_or(input);
                !bare.is_empty() && self.0.starts_with(bare)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Ok(Self(s.strip_prefix($display_prefix).unwrap_or(s).to_string()))
            }
        }
    };
}

define_id!(CardId, "card-");
define_id!(TransactionId, "txn-");
define_id!(SubscriptionId, "sub-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let id1 = CardId::new();
        let id2 = CardId::new();
        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 32);
    }

    #[test]
    fn test_short_form() {
        let id = CardId::from("k3j9x2a");
        assert_eq!(id.short(), "card-k3j9x2a");

        let long = TransactionId::from("0123456789abcdef");
        assert_eq!(long.short(), "txn-01234567");
    }

    #[test]
    fn test_matches_prefix() {
        let id = TransactionId::from("0123456789abcdef");
        assert!(id.matches("01234567"));
        assert!(id.matches("txn-0123"));
        assert!(id.matches("0123456789abcdef"));
        assert!(!id.matches("9999"));
        assert!(!id.matches(""));
        assert!(!id.matches("txn-"));
    }

    #[test]
    fn test_legacy_ids_round_trip() {
        let json = r#""k3j9x2a""#;
        let id: CardId = serde_json::from_str(json).unwrap();
        assert_eq!(id.as_str(), "k3j9x2a");
        assert_eq!(serde_json::to_string(&id).unwrap(), json);
    }
}
