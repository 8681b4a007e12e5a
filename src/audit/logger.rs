//! Append-only JSONL writer and reader for `audit.log`

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{WalletError, WalletResult};

use super::entry::AuditEntry;

/// Writes one JSON line per entry; nothing is ever rewritten
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush it to disk
    pub fn log(&self, entry: &AuditEntry) -> WalletResult<()> {
        let line = serde_json::to_string(entry)
            .map_err(|e| WalletError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| WalletError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| WalletError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Every entry in the order it was written
    pub fn read_all(&self) -> WalletResult<Vec<AuditEntry>> {
        let contents = match fs::read_to_string(&self.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(WalletError::Io(format!("Failed to read audit log: {}", e))),
        };

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    WalletError::Json(format!("Bad audit entry on line {}: {}", i + 1, e))
                })
            })
            .collect()
    }

    /// Up to `count` entries, newest first
    pub fn read_recent(&self, count: usize) -> WalletResult<Vec<AuditEntry>> {
        Ok(self.read_all()?.into_iter().rev().take(count).collect())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger_in(dir: &TempDir) -> AuditLogger {
        AuditLogger::new(dir.path().join("audit.log"))
    }

    #[test]
    fn test_log_and_read() {
        let temp = TempDir::new().unwrap();
        let logger = logger_in(&temp);
        let entry = AuditEntry::create(
            EntityType::Card,
            "k3j9x2a",
            Some("Travel".to_string()),
            &json!({"name": "Travel"}),
        );

        logger.log(&entry).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Travel"));
    }

    #[test]
    fn test_read_recent_is_newest_first() {
        let temp = TempDir::new().unwrap();
        let logger = logger_in(&temp);

        for i in 0..10 {
            let entry = AuditEntry::delete(
                EntityType::Transaction,
                format!("txn-{}", i),
                None,
                &json!({"amount": i}),
            );
            logger.log(&entry).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<&str> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, ["txn-9", "txn-8", "txn-7"]);
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let temp = TempDir::new().unwrap();
        let logger = logger_in(&temp);
        assert!(!logger.path().exists());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let temp = TempDir::new().unwrap();
        let logger = logger_in(&temp);
        logger
            .log(&AuditEntry::import("backup.json", "overwrite: 3 cards"))
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "{{oops").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
