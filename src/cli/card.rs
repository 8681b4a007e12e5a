//! Card CLI commands
//!
//! Implements CLI commands for card management.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::display::card::{format_card_details, format_card_list};
use crate::error::{WalletError, WalletResult};
use crate::models::{CardNetwork, CardTheme};
use crate::services::{CardPatch, CardService, NewCard};
use crate::storage::Storage;

use super::{local_now, parse_amount};

/// Descriptive card fields shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct CardDetailArgs {
    /// Card network (visa, mastercard, jcb, amex, other)
    #[arg(long)]
    pub network: Option<String>,
    /// Expiry date as MM/YY
    #[arg(long)]
    pub expiry: Option<String>,
    /// Credit limit (0 clears it)
    #[arg(long)]
    pub limit: Option<String>,
    /// Rewards description
    #[arg(long)]
    pub rewards: Option<String>,
    /// Reward cap description
    #[arg(long)]
    pub reward_cap: Option<String>,
    /// Channels the rewards apply to, comma separated
    #[arg(long)]
    pub channels: Option<String>,
    /// Annual fee waiver condition
    #[arg(long)]
    pub annual_fee: Option<String>,
    /// Card face theme (slate, blue, emerald, rose, amber, indigo, purple)
    #[arg(long)]
    pub theme: Option<String>,
}

/// Card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a new card
    Add {
        /// Card name
        name: String,
        /// Issuing bank
        #[arg(short, long, default_value = "")]
        bank: String,
        /// Day of month the statement closes (1-31)
        #[arg(short, long)]
        statement: u32,
        /// Day of month the payment is due (1-31)
        #[arg(short, long)]
        due: u32,
        #[command(flatten)]
        details: CardDetailArgs,
    },
    /// List all cards with this cycle's spending
    List,
    /// Show card details, current cycle and subscriptions
    Show {
        /// Card name or ID
        card: String,
    },
    /// Edit a card
    Edit {
        /// Card name or ID
        card: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New issuing bank
        #[arg(short, long)]
        bank: Option<String>,
        /// New statement day
        #[arg(short, long)]
        statement: Option<u32>,
        /// New due day
        #[arg(short, long)]
        due: Option<u32>,
        #[command(flatten)]
        details: CardDetailArgs,
    },
    /// Delete a card with all its transactions and subscriptions
    Delete {
        /// Card name or ID
        card: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Set or clear a custom card face image
    Image {
        /// Card name or ID
        card: String,
        /// Image file (png, jpg, gif, webp, svg)
        #[arg(required_unless_present = "clear")]
        path: Option<PathBuf>,
        /// Remove the custom image
        #[arg(long, conflicts_with = "path")]
        clear: bool,
    },
}

fn parse_network(input: &str) -> WalletResult<CardNetwork> {
    CardNetwork::parse(input).ok_or_else(|| {
        WalletError::Validation(format!(
            "Invalid network: '{}'. Valid networks: visa, mastercard, jcb, amex, other",
            input
        ))
    })
}

fn parse_theme(input: &str) -> WalletResult<CardTheme> {
    CardTheme::parse(input).ok_or_else(|| {
        let valid: Vec<String> = CardTheme::ALL.iter().map(|t| t.to_string()).collect();
        WalletError::Validation(format!(
            "Invalid theme: '{}'. Valid themes: {}",
            input,
            valid.join(", ")
        ))
    })
}

impl CardDetailArgs {
    fn into_patch(self) -> WalletResult<CardPatch> {
        Ok(CardPatch {
            network: self.network.as_deref().map(parse_network).transpose()?,
            expiry_date: self.expiry,
            credit_limit: self.limit.as_deref().map(parse_amount).transpose()?,
            rewards_info: self.rewards,
            reward_cap: self.reward_cap,
            applicable_channels: self.channels,
            annual_fee_condition: self.annual_fee,
            theme: self.theme.as_deref().map(parse_theme).transpose()?,
            ..CardPatch::default()
        })
    }
}

/// Handle a card command
pub fn handle_card_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CardCommands,
) -> WalletResult<()> {
    let service = CardService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        CardCommands::Add {
            name,
            bank,
            statement,
            due,
            details,
        } => {
            let details = details.into_patch()?;
            let card = service.create(NewCard {
                name,
                bank_name: bank,
                network: details.network,
                expiry_date: details.expiry_date.unwrap_or_default(),
                statement_date: statement,
                due_date: due,
                credit_limit: details.credit_limit,
                rewards_info: details.rewards_info.unwrap_or_default(),
                reward_cap: details.reward_cap.unwrap_or_default(),
                applicable_channels: details.applicable_channels,
                annual_fee_condition: details.annual_fee_condition.unwrap_or_default(),
                theme: details.theme.unwrap_or_default(),
            })?;

            println!("Created card: {}", card.name);
            println!("  Statement day: {}", card.statement_date);
            println!("  Due day:       {}", card.due_date);
            println!("  ID: {}", card.id);
        }

        CardCommands::List => {
            let summaries = service.list_with_summaries(local_now())?;
            println!(
                "{}",
                format_card_list(&summaries, symbol, settings.due_soon_days)
            );
        }

        CardCommands::Show { card } => {
            let found = service.require(&card)?;
            let summary = service.summary(found, local_now());
            print!("{}", format_card_details(&summary, symbol));
        }

        CardCommands::Edit {
            card,
            name,
            bank,
            statement,
            due,
            details,
        } => {
            let found = service.require(&card)?;

            let patch = CardPatch {
                name,
                bank_name: bank,
                statement_date: statement,
                due_date: due,
                ..details.into_patch()?
            };

            if patch.is_empty() {
                println!("No changes specified. See 'wallet card edit --help' for the fields.");
                return Ok(());
            }

            let updated = service.update(&found.id, patch)?;
            println!("Updated card: {}", updated.name);
        }

        CardCommands::Delete { card, force } => {
            let found = service.require(&card)?;

            if !force {
                println!(
                    "This will delete '{}' with {} transaction(s) and {} subscription(s).",
                    found.name,
                    found.transactions.len(),
                    found.subscriptions.len()
                );
                println!("To proceed, run again with --force flag:");
                println!("  wallet card delete \"{}\" --force", card);
                return Ok(());
            }

            let deleted = service.delete(&found.id)?;
            println!("Deleted card: {}", deleted.name);
        }

        CardCommands::Image { card, path, clear } => {
            let found = service.require(&card)?;

            if clear {
                service.clear_background_image(&found.id)?;
                println!("Removed custom image from: {}", found.name);
            } else if let Some(path) = path {
                service.set_background_image(&found.id, &path)?;
                println!("Set card image for {}: {}", found.name, path.display());
            }
        }
    }

    Ok(())
}
