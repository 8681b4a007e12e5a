//! Display formatting for terminal output
//!
//! Provides utilities for formatting cards, transactions and subscriptions
//! as plain-text tables and detail views.

pub mod card;
pub mod transaction;

pub use card::{format_card_details, format_card_list};
pub use transaction::{format_subscription_list, format_transaction_register, format_transaction_row};
