//! Backup service
//!
//! Exports the collection as a backup document and imports one back under
//! the merge or overwrite policy. An overwrite first saves a safety
//! snapshot of the current collection.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};

use crate::backup::{apply_import, backup_filename, codec, BackupManager, ImportMode, ImportOutcome};
use crate::config::settings::Settings;
use crate::error::WalletResult;
use crate::storage::Storage;

/// A rendered backup ready to be written out
#[derive(Debug, Clone)]
pub struct BackupExport {
    /// Suggested file name
    pub filename: String,
    pub contents: String,
    pub card_count: usize,
}

/// What an import did
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub outcome: ImportOutcome,
    /// Version tag found in the imported document
    pub version: String,
    /// Snapshot written before an overwrite
    pub snapshot: Option<PathBuf>,
    /// Entries in the document's card list that were not card objects
    pub unreadable: usize,
}

/// Service for backup export and import
pub struct BackupService<'a> {
    storage: &'a Storage,
    manager: BackupManager,
}

impl<'a> BackupService<'a> {
    /// Create a new backup service
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            manager: BackupManager::new(
                storage.paths().backup_dir(),
                settings.backup_retention.clone(),
            ),
            storage,
        }
    }

    /// Get the snapshot manager
    pub fn manager(&self) -> &BackupManager {
        &self.manager
    }

    /// Render the whole collection as a backup document
    pub fn export(&self, now: DateTime<Utc>) -> WalletResult<BackupExport> {
        let cards = self.storage.cards.get_all()?;
        let contents = codec::serialize(&cards, now)?;

        Ok(BackupExport {
            filename: backup_filename(now.with_timezone(&Local).date_naive()),
            card_count: cards.len(),
            contents,
        })
    }

    /// Preview an import without changing anything
    pub fn preview(&self, text: &str, mode: ImportMode) -> WalletResult<ImportOutcome> {
        let envelope = codec::deserialize(text)?;
        let existing = self.storage.cards.get_all()?;
        Ok(apply_import(&existing, &envelope.cards, mode))
    }

    /// Import a backup document
    ///
    /// A document that fails to parse leaves the collection untouched.
    pub fn import(&self, text: &str, mode: ImportMode, source: &str) -> WalletResult<ImportReport> {
        let envelope = codec::deserialize(text)?;
        let existing = self.storage.cards.get_all()?;
        let outcome = apply_import(&existing, &envelope.cards, mode);

        let snapshot = match mode {
            ImportMode::Overwrite if !existing.is_empty() => {
                let path = self.manager.create_snapshot(&existing)?;
                self.manager.enforce_retention()?;
                Some(path)
            }
            _ => None,
        };

        self.storage.cards.replace_all(outcome.cards.clone())?;
        self.storage.cards.save()?;
        self.storage.log_import(source, &outcome.summary())?;

        Ok(ImportReport {
            outcome,
            version: envelope.version,
            snapshot,
            unreadable: envelope.unreadable.len(),
        })
    }
}
