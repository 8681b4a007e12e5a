//! Transaction CLI commands
//!
//! Implements CLI commands for recording and removing card charges.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::format_transaction_register;
use crate::error::WalletResult;
use crate::services::{CardService, TransactionScope, TransactionService};
use crate::storage::Storage;

use super::{local_now, parse_amount};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a charge on a card, dated now
    Add {
        /// Card name or ID
        card: String,
        /// Amount (e.g., "1200" or "1,200")
        amount: String,
        /// Description, defaults to "General purchase"
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List a card's transactions, newest first
    List {
        /// Card name or ID
        card: String,
        /// Show every transaction instead of the current cycle
        #[arg(short, long, conflicts_with = "previous")]
        all: bool,
        /// Show the previous cycle
        #[arg(short, long)]
        previous: bool,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete a transaction
    Delete {
        /// Card name or ID
        card: String,
        /// Transaction ID or unique ID prefix
        transaction: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> WalletResult<()> {
    let cards = CardService::new(storage);
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            card,
            amount,
            description,
        } => {
            let found = cards.require(&card)?;
            let amount = parse_amount(&amount)?;
            let txn = service.add(&found.id, amount, description.as_deref())?;

            println!(
                "Recorded {} on {}: {}",
                txn.amount.format_with_symbol(symbol),
                found.name,
                txn.label()
            );
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            card,
            all,
            previous,
            limit,
        } => {
            let found = cards.require(&card)?;
            let scope = if all {
                TransactionScope::All
            } else if previous {
                TransactionScope::PreviousCycle
            } else {
                TransactionScope::CurrentCycle
            };

            let mut transactions = service.list(&found.id, scope, local_now())?;
            if let Some(limit) = limit {
                transactions.truncate(limit);
            }

            let heading = match scope {
                TransactionScope::CurrentCycle => "current cycle",
                TransactionScope::PreviousCycle => "previous cycle",
                TransactionScope::All => "all",
            };
            println!("{} ({})", found.name, heading);
            print!("{}", format_transaction_register(&transactions, symbol));
        }

        TransactionCommands::Delete { card, transaction } => {
            let found = cards.require(&card)?;
            let removed = service.delete(&found.id, &transaction)?;
            println!(
                "Deleted transaction {} ({}) from {}",
                removed.id.short(),
                removed.amount.format_with_symbol(symbol),
                found.name
            );
        }
    }

    Ok(())
}
