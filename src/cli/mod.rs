//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod calendar;
pub mod card;
pub mod export;
pub mod log;
pub mod subscription;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use calendar::handle_calendar_command;
pub use card::{handle_card_command, CardCommands};
pub use export::{handle_export_command, ExportCommands};
pub use log::handle_log_command;
pub use subscription::{handle_subscription_command, SubscriptionCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

use crate::error::{WalletError, WalletResult};
use crate::models::Money;
use crate::storage::write_text_atomic;

/// Current local wall-clock time
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a user-entered amount
pub(crate) fn parse_amount(input: &str) -> WalletResult<Money> {
    Money::parse(input).map_err(|e| {
        WalletError::Validation(format!(
            "{}. Use whole units like '1200' or '1,200'",
            e
        ))
    })
}

/// Write generated text to `output`, `default_name` in the working
/// directory, or stdout when `output` is "-"
///
/// Returns the path written, or None for stdout.
pub(crate) fn write_output(
    output: Option<PathBuf>,
    default_name: &str,
    contents: &str,
) -> WalletResult<Option<PathBuf>> {
    let path = output.unwrap_or_else(|| PathBuf::from(default_name));

    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(None);
    }

    write_text_atomic(&path, contents)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,200").unwrap(), Money::new(1200));
        assert!(parse_amount("12.50").unwrap_err().is_validation());
    }

    #[test]
    fn test_write_output_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out.txt");

        let written = write_output(Some(target.clone()), "ignored.txt", "hello").unwrap();
        assert_eq!(written, Some(target.clone()));
        assert_eq!(std::fs::read_to_string(target).unwrap(), "hello");
    }
}
