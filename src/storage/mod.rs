//! Storage layer for the card wallet
//!
//! `Storage` is the single state container for the card collection. It is
//! created by the application entry point and handed by reference to the
//! services; each service saves the collection after a successful mutation.

pub mod cards;
pub mod file_io;

pub use cards::CardRepository;
pub use file_io::{read_json, write_json_atomic, write_text_atomic};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::WalletPaths;
use crate::error::WalletError;

/// Card field that holds an inline image; kept out of the audit log
const IMAGE_FIELD: &str = "backgroundImage";

/// Main storage coordinator
pub struct Storage {
    paths: WalletPaths,
    pub cards: CardRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: WalletPaths) -> Result<Self, WalletError> {
        paths.ensure_directories()?;

        Ok(Self {
            cards: CardRepository::new(paths.cards_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &WalletPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), WalletError> {
        self.cards.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), WalletError> {
        self.cards.save()
    }

    /// Record a create operation
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), WalletError> {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity)
            .without_field(IMAGE_FIELD);
        self.audit.log(&entry)
    }

    /// Record an update operation with a field diff
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), WalletError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff)
            .without_field(IMAGE_FIELD);
        self.audit.log(&entry)
    }

    /// Record a delete operation
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), WalletError> {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity)
            .without_field(IMAGE_FIELD);
        self.audit.log(&entry)
    }

    /// Record a backup import
    pub fn log_import(&self, source: &str, summary: &str) -> Result<(), WalletError> {
        self.audit.log(&AuditEntry::import(source, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::Card;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert_eq!(storage.cards.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_helpers_strip_images() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let mut card = Card::new("Photo Card", "Bank", 5, 20);
        card.background_image = Some("data:image/png;base64,AAAA".into());
        storage
            .log_create(EntityType::Card, card.id.as_str(), Some(card.name.clone()), &card)
            .unwrap();

        let mut renamed = card.clone();
        renamed.name = "Renamed".into();
        storage
            .log_update(EntityType::Card, card.id.as_str(), None, &card, &renamed)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        let after = entries[0].after.as_ref().unwrap();
        assert!(after.get("backgroundImage").is_none());
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("name: \"Photo Card\" -> \"Renamed\"")
        );
    }
}
