//! Audit logging for the card wallet
//!
//! Records every create, update, delete and import with before/after values
//! in an append-only, line-delimited JSON log.
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends entries to `audit.log` and reads them back
//! - `generate_diff`: top-level field changes between two entity states

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
