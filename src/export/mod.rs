//! Export module for the card wallet
//!
//! - CSV: transactions and card summaries (spreadsheet-compatible)
//! - ICS: calendar reminder for a card's next payment
//!
//! Full JSON backups live in [`crate::backup`].

pub mod csv;
pub mod ics;

pub use self::csv::{export_cards_csv, export_transactions_csv};
pub use self::ics::{due_reminder_ics, ics_filename};
