//! Backup system for the card wallet
//!
//! - `codec`: the versioned JSON envelope used for backup files
//! - `import`: merge/overwrite policy applied when a backup is loaded
//! - `manager`: safety snapshots written before destructive imports
//!
//! # Example
//!
//! ```rust,ignore
//! use card_wallet::backup::{codec, apply_import, ImportMode};
//!
//! let text = codec::serialize(&cards, Utc::now())?;
//! let envelope = codec::deserialize(&text)?;
//! let outcome = apply_import(&cards, &envelope.cards, ImportMode::Merge);
//! ```

pub mod codec;
mod import;
mod manager;

pub use codec::{backup_filename, BackupEnvelope, BACKUP_VERSION};
pub use import::{apply_import, merge_cards, ImportMode, ImportOutcome};
pub use manager::{BackupManager, SnapshotInfo};
