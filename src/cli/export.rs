//! CLI commands for data export
//!
//! Provides commands for exporting transactions and card summaries as CSV.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{WalletError, WalletResult};
use crate::export::{export_cards_csv, export_transactions_csv};
use crate::storage::Storage;

use super::local_now;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every transaction to CSV
    Transactions {
        /// Output file path (stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Export one summary row per card to CSV
    Cards {
        /// Output file path (stdout when omitted)
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> WalletResult<()> {
    let cards = storage.cards.get_all()?;

    match cmd {
        ExportCommands::Transactions { output } => match output {
            Some(path) => {
                export_transactions_csv(&cards, create_file(&path)?)?;
                let count: usize = cards.iter().map(|c| c.transactions.len()).sum();
                println!("Exported {} transactions to: {}", count, path.display());
            }
            None => export_transactions_csv(&cards, io::stdout().lock())?,
        },

        ExportCommands::Cards { output } => match output {
            Some(path) => {
                export_cards_csv(&cards, local_now(), create_file(&path)?)?;
                println!("Exported {} cards to: {}", cards.len(), path.display());
            }
            None => export_cards_csv(&cards, local_now(), io::stdout().lock())?,
        },
    }

    Ok(())
}

fn create_file(path: &Path) -> WalletResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        WalletError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
