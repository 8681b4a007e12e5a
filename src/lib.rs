//! card-wallet - a personal credit-card wallet for the terminal
//!
//! This library provides the core functionality for the card wallet: it
//! records credit cards, tracks spending per billing cycle, manages
//! recurring subscription charges, exports calendar reminders for upcoming
//! payments, and exchanges the whole collection as a JSON backup.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (cards, transactions, subscriptions)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer, including the billing-cycle calculator
//! - `audit`: Audit logging system
//! - `backup`: Backup codec, import policy and safety snapshots
//! - `export`: CSV and calendar (ICS) export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `wallet` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use card_wallet::config::{paths::WalletPaths, settings::Settings};
//! use card_wallet::storage::Storage;
//!
//! let paths = WalletPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{WalletError, WalletResult};
