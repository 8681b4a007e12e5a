//! Subscription CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::format_subscription_list;
use crate::error::WalletResult;
use crate::services::{CardService, SubscriptionService};
use crate::storage::Storage;

use super::parse_amount;

/// Subscription subcommands
#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Attach a monthly charge to a card
    Add {
        /// Card name or ID
        card: String,
        /// Service name (e.g., "Netflix")
        name: String,
        /// Monthly fee
        amount: String,
    },
    /// List a card's subscriptions
    List {
        /// Card name or ID
        card: String,
    },
    /// Remove a subscription
    Delete {
        /// Card name or ID
        card: String,
        /// Subscription name, ID or unique ID prefix
        subscription: String,
    },
}

/// Handle a subscription command
pub fn handle_subscription_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SubscriptionCommands,
) -> WalletResult<()> {
    let cards = CardService::new(storage);
    let service = SubscriptionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SubscriptionCommands::Add { card, name, amount } => {
            let found = cards.require(&card)?;
            let sub = service.add(&found.id, &name, parse_amount(&amount)?)?;
            println!(
                "Added subscription {} ({}/month) to {}",
                sub.name,
                sub.amount.format_with_symbol(symbol),
                found.name
            );
        }

        SubscriptionCommands::List { card } => {
            let found = cards.require(&card)?;
            println!("{} subscriptions", found.name);
            print!(
                "{}",
                format_subscription_list(&service.list(&found.id)?, symbol)
            );
        }

        SubscriptionCommands::Delete { card, subscription } => {
            let found = cards.require(&card)?;
            let removed = service.delete(&found.id, &subscription)?;
            println!("Removed subscription {} from {}", removed.name, found.name);
        }
    }

    Ok(())
}
