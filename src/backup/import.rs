//! Import policy for backup files
//!
//! Merge keeps every existing card and appends incoming cards whose id is
//! not already present. A colliding incoming card is dropped whole, never
//! merged field by field. Overwrite replaces the collection.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::models::{Card, CardId};

/// How an imported backup is combined with the current collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Merge,
    Overwrite,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl FromStr for ImportMode {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "overwrite" | "replace" => Ok(Self::Overwrite),
            other => Err(WalletError::Validation(format!(
                "Invalid import mode: '{}'. Valid modes: merge, overwrite",
                other
            ))),
        }
    }
}

/// Result of combining a backup with the current collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub mode: ImportMode,
    /// The collection after the import
    pub cards: Vec<Card>,
    /// Incoming cards that made it into the collection
    pub added: usize,
    /// Incoming cards dropped because their id was already taken
    pub skipped: usize,
    /// Existing cards discarded by an overwrite
    pub replaced: usize,
}

impl ImportOutcome {
    pub fn summary(&self) -> String {
        match self.mode {
            ImportMode::Merge => format!(
                "merge: {} added, {} skipped (id already present)",
                self.added, self.skipped
            ),
            ImportMode::Overwrite => format!(
                "overwrite: {} cards replaced by {}",
                self.replaced, self.added
            ),
        }
    }
}

/// Keep `existing` and append incoming cards with ids not seen yet
pub fn merge_cards(existing: &[Card], incoming: &[Card]) -> Vec<Card> {
    let mut seen: HashSet<&CardId> = existing.iter().map(|c| &c.id).collect();
    let mut merged = existing.to_vec();

    for card in incoming {
        if seen.insert(&card.id) {
            merged.push(card.clone());
        }
    }

    merged
}

/// Combine an imported collection with the current one
pub fn apply_import(existing: &[Card], incoming: &[Card], mode: ImportMode) -> ImportOutcome {
    match mode {
        ImportMode::Merge => {
            let cards = merge_cards(existing, incoming);
            let added = cards.len() - existing.len();
            ImportOutcome {
                mode,
                added,
                skipped: incoming.len() - added,
                replaced: 0,
                cards,
            }
        }
        ImportMode::Overwrite => ImportOutcome {
            mode,
            cards: incoming.to_vec(),
            added: incoming.len(),
            skipped: 0,
            replaced: existing.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str) -> Card {
        let mut card = Card::new(name, "Bank", 5, 20);
        card.id = CardId::from(id);
        card
    }

    fn ids(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_merge_keeps_existing_on_collision() {
        let existing = vec![card("A", "Existing A"), card("B", "Existing B")];
        let incoming = vec![card("B", "Incoming B"), card("C", "Incoming C")];

        let outcome = apply_import(&existing, &incoming, ImportMode::Merge);

        assert_eq!(ids(&outcome.cards), vec!["A", "B", "C"]);
        assert_eq!(outcome.cards[1].name, "Existing B");
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_merge_drops_duplicates_within_incoming() {
        let existing = vec![card("A", "A")];
        let incoming = vec![card("C", "First C"), card("C", "Second C")];

        let merged = merge_cards(&existing, &incoming);
        assert_eq!(ids(&merged), vec!["A", "C"]);
        assert_eq!(merged[1].name, "First C");
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let existing = vec![card("A", "A")];
        let incoming = vec![card("B", "B")];
        let _ = merge_cards(&existing, &incoming);
        assert_eq!(existing.len(), 1);
        assert_eq!(incoming.len(), 1);
    }

    #[test]
    fn test_overwrite_replaces_everything() {
        let existing = vec![card("A", "A"), card("B", "B")];
        let incoming = vec![card("C", "C")];

        let outcome = apply_import(&existing, &incoming, ImportMode::Overwrite);

        assert_eq!(ids(&outcome.cards), vec!["C"]);
        assert_eq!(outcome.replaced, 2);
        assert_eq!(outcome.summary(), "overwrite: 2 cards replaced by 1");
    }

    #[test]
    fn test_merge_into_empty_collection() {
        let incoming = vec![card("A", "A"), card("B", "B")];
        let outcome = apply_import(&[], &incoming, ImportMode::Merge);
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("merge".parse::<ImportMode>().unwrap(), ImportMode::Merge);
        assert_eq!("Overwrite".parse::<ImportMode>().unwrap(), ImportMode::Overwrite);
        assert!("append".parse::<ImportMode>().is_err());
    }
}
