//! Calendar CLI command
//!
//! Writes an `.ics` reminder for a card's next payment.

use std::path::PathBuf;

use crate::error::WalletResult;
use crate::export::ics::{due_reminder_ics, ics_filename};
use crate::services::cycle::next_due_date;
use crate::services::CardService;
use crate::storage::Storage;

use super::{local_now, write_output};

/// Handle the calendar command
pub fn handle_calendar_command(
    storage: &Storage,
    card: &str,
    output: Option<PathBuf>,
) -> WalletResult<()> {
    let found = CardService::new(storage).require(card)?;
    let due = next_due_date(found.due_date, local_now());

    let ics = due_reminder_ics(&found.name, due);
    if let Some(path) = write_output(output, &ics_filename(&found.name), &ics)? {
        println!(
            "Payment reminder for {} on {} written to: {}",
            found.name,
            due.format("%Y-%m-%d"),
            path.display()
        );
    }

    Ok(())
}
