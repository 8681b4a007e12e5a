//! Core data models for the card wallet
//!
//! Cards own their transactions and subscriptions; the whole collection is
//! persisted and exchanged as one unit.

pub mod card;
pub mod ids;
pub(crate) mod lenient;
pub mod money;
pub mod transaction;

pub use card::{Card, CardNetwork, CardTheme, CardValidationError};
pub use ids::{CardId, SubscriptionId, TransactionId};
pub use money::Money;
pub use transaction::{Subscription, Transaction};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the millisecond precision records are stored at
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
