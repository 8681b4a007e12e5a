//! Service layer for the card wallet
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, billing-cycle figures, and backup exchange.

pub mod backup;
pub mod card;
pub mod cycle;
pub mod subscription;
pub mod transaction;

pub use backup::{BackupExport, BackupService, ImportReport};
pub use card::{CardPatch, CardService, CardSummary, NewCard};
pub use cycle::{CycleSummary, CycleWindow};
pub use subscription::SubscriptionService;
pub use transaction::{TransactionScope, TransactionService};
