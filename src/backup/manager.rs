//! Safety snapshots of the card collection
//!
//! A snapshot is written before any import that replaces the collection.
//! Snapshots use the regular backup envelope, so any of them can be fed
//! back to `wallet backup import`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::config::settings::BackupRetention;
use crate::error::{WalletError, WalletResult};
use crate::models::{now_millis, Card};
use crate::storage::write_text_atomic;

use super::codec;

const SNAPSHOT_PREFIX: &str = "snapshot-";

/// Metadata about a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages snapshot creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf, retention: BackupRetention) -> Self {
        Self {
            backup_dir,
            retention,
        }
    }

    /// Write a snapshot of `cards`, returning its path
    pub fn create_snapshot(&self, cards: &[Card]) -> WalletResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| WalletError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = now_millis();
        let filename = format!(
            "{}{}-{:03}.json",
            SNAPSHOT_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let path = self.backup_dir.join(filename);

        write_text_atomic(&path, &codec::serialize(cards, now)?)?;
        Ok(path)
    }

    /// List all snapshots, newest first
    pub fn list_snapshots(&self) -> WalletResult<Vec<SnapshotInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| WalletError::Io(format!("Failed to read backup directory: {}", e)))?;

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| WalletError::Io(format!("Failed to read directory entry: {}", e)))?;
            if let Some(info) = parse_snapshot_info(&entry.path()) {
                snapshots.push(info);
            }
        }

        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots)
    }

    /// Get the most recent snapshot
    pub fn latest_snapshot(&self) -> WalletResult<Option<SnapshotInfo>> {
        Ok(self.list_snapshots()?.into_iter().next())
    }

    /// Delete snapshots beyond the retention count, returning their paths
    pub fn enforce_retention(&self) -> WalletResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for snapshot in self
            .list_snapshots()?
            .into_iter()
            .skip(self.retention.keep_count as usize)
        {
            fs::remove_file(&snapshot.path)
                .map_err(|e| WalletError::Io(format!("Failed to delete old snapshot: {}", e)))?;
            deleted.push(snapshot.path);
        }

        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

fn parse_snapshot_info(path: &Path) -> Option<SnapshotInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename
        .strip_prefix(SNAPSHOT_PREFIX)?
        .strip_suffix(".json")?;
    let created_at = parse_snapshot_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(SnapshotInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm`
fn parse_snapshot_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let (date_part, time_part, millis_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S").ok()?;
    let millis: i64 = millis_part.parse().ok()?;

    let naive = NaiveDateTime::new(date, time) + chrono::Duration::milliseconds(millis);
    Some(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn create_test_manager(keep_count: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupManager::new(
            temp_dir.path().join("backups"),
            BackupRetention { keep_count },
        );
        (manager, temp_dir)
    }

    #[test]
    fn test_create_snapshot_is_importable() {
        let (manager, _temp) = create_test_manager(5);
        let cards = vec![Card::new("Travel", "Bank", 5, 20)];

        let path = manager.create_snapshot(&cards).unwrap();
        assert!(path.exists());

        let envelope = codec::deserialize(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(envelope.cards, cards);
    }

    #[test]
    fn test_list_newest_first() {
        let (manager, _temp) = create_test_manager(5);

        manager.create_snapshot(&[]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let newest = manager.create_snapshot(&[]).unwrap();

        let snapshots = manager.list_snapshots().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots[0].created_at >= snapshots[1].created_at);
        assert_eq!(manager.latest_snapshot().unwrap().unwrap().path, newest);
    }

    #[test]
    fn test_retention() {
        let (manager, _temp) = create_test_manager(2);

        for _ in 0..4 {
            manager.create_snapshot(&[]).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_snapshots().unwrap().len(), 2);
    }

    #[test]
    fn test_ignores_foreign_files() {
        let (manager, _temp) = create_test_manager(2);
        fs::create_dir_all(manager.backup_dir()).unwrap();
        fs::write(manager.backup_dir().join("notes.txt"), "hi").unwrap();
        fs::write(manager.backup_dir().join("snapshot-garbage.json"), "{}").unwrap();

        assert!(manager.list_snapshots().unwrap().is_empty());
        assert!(manager.latest_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_parse_snapshot_timestamp() {
        let ts = parse_snapshot_timestamp("20241006-143022-456").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 10, 6));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 30, 22));
        assert_eq!(ts.timestamp_subsec_millis(), 456);

        assert!(parse_snapshot_timestamp("20241006-143022").is_none());
        assert!(parse_snapshot_timestamp("garbage-143022-1").is_none());
    }
}
