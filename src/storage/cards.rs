//! Card repository for JSON storage
//!
//! The whole collection lives in `cards.json` as a bare JSON array and is
//! always read and written as one unit. Insertion order is preserved.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::WalletError;
use crate::models::{Card, CardId};

use super::file_io::{read_json, write_json_atomic};

/// Repository for card persistence
pub struct CardRepository {
    path: PathBuf,
    data: RwLock<Vec<Card>>,
}

impl CardRepository {
    /// Create a new card repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Card>>, WalletError> {
        self.data
            .read()
            .map_err(|e| WalletError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Card>>, WalletError> {
        self.data
            .write()
            .map_err(|e| WalletError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load cards from disk
    pub fn load(&self) -> Result<(), WalletError> {
        let cards: Vec<Card> = read_json(&self.path)?;
        *self.write()? = cards;
        Ok(())
    }

    /// Save cards to disk
    pub fn save(&self) -> Result<(), WalletError> {
        let data = self.read()?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get a card by ID
    pub fn get(&self, id: &CardId) -> Result<Option<Card>, WalletError> {
        Ok(self.read()?.iter().find(|c| &c.id == id).cloned())
    }

    /// Get all cards in collection order
    pub fn get_all(&self) -> Result<Vec<Card>, WalletError> {
        Ok(self.read()?.clone())
    }

    /// Get a card by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Card>, WalletError> {
        let name_lower = name.trim().to_lowercase();
        Ok(self
            .read()?
            .iter()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Get the only card whose id starts with `prefix`
    pub fn get_by_id_prefix(&self, prefix: &str) -> Result<Option<Card>, WalletError> {
        let data = self.read()?;
        let mut matches = data.iter().filter(|c| c.id.matches(prefix));
        Ok(match (matches.next(), matches.next()) {
            (Some(card), None) => Some(card.clone()),
            _ => None,
        })
    }

    /// Replace a card with the same id in place, or append a new one
    pub fn upsert(&self, card: Card) -> Result<(), WalletError> {
        let mut data = self.write()?;
        match data.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => data.push(card),
        }
        Ok(())
    }

    /// Delete a card, returning it if it existed
    pub fn delete(&self, id: &CardId) -> Result<Option<Card>, WalletError> {
        let mut data = self.write()?;
        let index = data.iter().position(|c| &c.id == id);
        Ok(index.map(|index| data.remove(index)))
    }

    /// Replace the whole collection
    pub fn replace_all(&self, cards: Vec<Card>) -> Result<(), WalletError> {
        *self.write()? = cards;
        Ok(())
    }

    /// Check if a card exists
    pub fn exists(&self, id: &CardId) -> Result<bool, WalletError> {
        Ok(self.read()?.iter().any(|c| &c.id == id))
    }

    /// Check if a card name is already taken
    pub fn name_exists(&self, name: &str, exclude_id: Option<&CardId>) -> Result<bool, WalletError> {
        let name_lower = name.trim().to_lowercase();
        Ok(self
            .read()?
            .iter()
            .any(|c| c.name.to_lowercase() == name_lower && Some(&c.id) != exclude_id))
    }

    /// Count cards
    pub fn count(&self) -> Result<usize, WalletError> {
        Ok(self.read()?.len())
    }
}
