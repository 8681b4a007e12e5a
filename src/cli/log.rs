//! Audit log CLI command

use crate::error::WalletResult;
use crate::storage::Storage;

/// Print the most recent audit entries, newest first
pub fn handle_log_command(storage: &Storage, limit: usize) -> WalletResult<()> {
    let entries = storage.audit().read_recent(limit)?;

    if entries.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
