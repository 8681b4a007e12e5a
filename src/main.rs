use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use card_wallet::cli::{
    handle_backup_command, handle_calendar_command, handle_card_command, handle_export_command,
    handle_log_command, handle_subscription_command, handle_transaction_command,
};
use card_wallet::config::{paths::WalletPaths, settings::Settings};
use card_wallet::storage::Storage;

#[derive(Parser)]
#[command(
    name = "wallet",
    version,
    about = "Personal credit-card wallet for the terminal",
    long_about = "card-wallet keeps track of your credit cards: spending per billing \
                  cycle, monthly subscriptions, upcoming payment dates and JSON \
                  backups you can move between machines."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Card management commands
    #[command(subcommand)]
    Card(card_wallet::cli::CardCommands),

    /// Transaction commands
    #[command(subcommand, alias = "transaction")]
    Txn(card_wallet::cli::TransactionCommands),

    /// Subscription commands
    #[command(subcommand, alias = "subscription")]
    Sub(card_wallet::cli::SubscriptionCommands),

    /// Backup export, import and snapshots
    #[command(subcommand)]
    Backup(card_wallet::cli::BackupCommands),

    /// Write a calendar reminder for a card's next payment
    Calendar {
        /// Card name or ID
        card: String,
        /// Output file ("-" for stdout); defaults to <card>_payment_reminder.ics
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// CSV export commands
    #[command(subcommand)]
    Export(card_wallet::cli::ExportCommands),

    /// Show recent activity from the audit log
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write the settings file so it can be edited
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = WalletPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Card(cmd)) => handle_card_command(&storage, &settings, cmd)?,
        Some(Commands::Txn(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Sub(cmd)) => handle_subscription_command(&storage, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, &settings, cmd)?,
        Some(Commands::Calendar { card, output }) => {
            handle_calendar_command(&storage, &card, output)?
        }
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Log { limit }) => handle_log_command(&storage, limit)?,
        Some(Commands::Config { write }) => {
            if write {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
                println!();
            }

            println!("card-wallet Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Cards file:       {}", paths.cards_file().display());
            println!("Snapshots:        {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Due soon threshold:  {} day(s)", settings.due_soon_days);
            println!("  Default import mode: {}", settings.default_import_mode);
            println!(
                "  Snapshots kept:      {}",
                settings.backup_retention.keep_count
            );
        }
        None => {
            println!("card-wallet - credit cards, billing cycles and payment reminders");
            println!();
            println!("Run 'wallet --help' for usage information.");
            println!("Run 'wallet card add --help' to add your first card.");
        }
    }

    Ok(())
}
