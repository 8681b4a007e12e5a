//! Backup CLI commands
//!
//! Implements CLI commands for backup export, import and safety snapshots.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;

use crate::backup::{BackupManager, ImportMode};
use crate::config::settings::Settings;
use crate::error::{WalletError, WalletResult};
use crate::services::BackupService;
use crate::storage::Storage;

use super::write_output;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Export every card to a backup file
    Export {
        /// Output file ("-" for stdout); defaults to cardmanager_backup_<date>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a backup file
    Import {
        /// Backup file, snapshot filename, or 'latest' for the newest snapshot
        file: String,

        /// merge (keep existing cards, add new ids) or overwrite (replace everything)
        #[arg(short, long)]
        mode: Option<ImportMode>,

        /// Skip confirmation for overwrite
        #[arg(short, long)]
        force: bool,
    },

    /// List safety snapshots taken before overwrites
    Snapshots {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> WalletResult<()> {
    let service = BackupService::new(storage, settings);

    match cmd {
        BackupCommands::Export { output } => {
            let export = service.export(Utc::now())?;
            if let Some(path) = write_output(output, &export.filename, &export.contents)? {
                println!(
                    "Exported {} card(s) to: {}",
                    export.card_count,
                    path.display()
                );
            }
        }

        BackupCommands::Import { file, mode, force } => {
            let mode = mode.unwrap_or(settings.default_import_mode);
            let path = resolve_backup_path(service.manager(), &file)?;

            let text = std::fs::read_to_string(&path).map_err(|e| {
                WalletError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            if mode == ImportMode::Overwrite && !force {
                let preview = service.preview(&text, mode)?;
                println!("Import Preview");
                println!("==============");
                println!("File: {}", path.display());
                println!(
                    "Current cards: {}, cards in backup: {}",
                    preview.replaced, preview.added
                );
                println!();
                println!("WARNING: This will replace ALL current cards!");
                println!("To proceed, run again with --force flag:");
                println!("  wallet backup import {} --mode overwrite --force", file);
                return Ok(());
            }

            let source = path.display().to_string();
            let report = service.import(&text, mode, &source)?;

            if let Some(snapshot) = &report.snapshot {
                println!("Snapshot of previous cards: {}", snapshot.display());
            }
            if !report.version.is_empty() && report.version != crate::backup::BACKUP_VERSION {
                println!(
                    "Note: backup version {} differs from {}",
                    report.version,
                    crate::backup::BACKUP_VERSION
                );
            }
            if report.unreadable > 0 {
                println!(
                    "Note: ignored {} entry(ies) in the backup that are not cards",
                    report.unreadable
                );
            }
            println!("Import complete ({})", report.outcome.summary());
            println!("Cards now: {}", report.outcome.cards.len());
        }

        BackupCommands::Snapshots { verbose } => {
            let snapshots = service.manager().list_snapshots()?;

            if snapshots.is_empty() {
                println!("No snapshots found.");
                println!("Snapshots are taken automatically before an overwrite import.");
                return Ok(());
            }

            println!("Available Snapshots");
            println!("===================");
            println!();

            for (i, snapshot) in snapshots.iter().enumerate() {
                let age = format_duration(Utc::now().signed_duration_since(snapshot.created_at));

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        snapshot.filename,
                        snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(snapshot.size_bytes),
                        age,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        snapshot.filename,
                        age,
                        format_size(snapshot.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} snapshot(s)", snapshots.len());
            println!("Restore one with: wallet backup import <filename> --mode overwrite");
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> WalletResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_snapshot()?
            .map(|s| s.path)
            .ok_or_else(|| WalletError::NotFound {
                entity_type: "Snapshot",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_backup_dir = manager.backup_dir().join(backup);
    if in_backup_dir.exists() {
        return Ok(in_backup_dir);
    }

    Err(WalletError::NotFound {
        entity_type: "Backup file",
        identifier: backup.to_string(),
    })
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::BackupRetention;
    use tempfile::TempDir;

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::hours(5)), "5h");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }

    #[test]
    fn test_resolve_backup_path() {
        let temp_dir = TempDir::new().unwrap();
        let manager = BackupManager::new(
            temp_dir.path().join("backups"),
            BackupRetention::default(),
        );

        assert!(resolve_backup_path(&manager, "latest")
            .unwrap_err()
            .is_not_found());

        let snapshot = manager.create_snapshot(&[]).unwrap();
        assert_eq!(resolve_backup_path(&manager, "latest").unwrap(), snapshot);

        let name = snapshot.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(resolve_backup_path(&manager, &name).unwrap(), snapshot);
        assert!(resolve_backup_path(&manager, "missing.json").is_err());
    }
}
