//! Transaction service
//!
//! Records charges against a card. Transactions are never edited; a mistake
//! is fixed by deleting the charge and recording it again.

use chrono::NaiveDateTime;

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{Card, CardId, Money, Transaction};
use crate::storage::Storage;

use super::cycle::{to_local, CycleWindow};

/// Description recorded when none is given
pub const DEFAULT_DESCRIPTION: &str = "General purchase";

/// Which of a card's transactions to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionScope {
    /// Only the current billing cycle
    #[default]
    CurrentCycle,
    /// The previous billing cycle
    PreviousCycle,
    /// Everything ever recorded
    All,
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn card(&self, card_id: &CardId) -> WalletResult<Card> {
        self.storage
            .cards
            .get(card_id)?
            .ok_or_else(|| WalletError::card_not_found(card_id.as_str()))
    }

    /// Record a new charge on a card, stamped with the current time
    pub fn add(
        &self,
        card_id: &CardId,
        amount: Money,
        description: Option<&str>,
    ) -> WalletResult<Transaction> {
        if !amount.is_positive() {
            return Err(WalletError::Validation(format!(
                "Transaction amount must be positive (got {})",
                amount.units()
            )));
        }

        let mut card = self.card(card_id)?;

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);
        let txn = Transaction::new(amount, Some(description.to_string()));

        card.transactions.push(txn.clone());
        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.as_str(),
            Some(format!("{}: {}", card.name, txn.label())),
            &txn,
        )?;

        Ok(txn)
    }

    /// List a card's transactions, newest first
    pub fn list(
        &self,
        card_id: &CardId,
        scope: TransactionScope,
        now: NaiveDateTime,
    ) -> WalletResult<Vec<Transaction>> {
        let card = self.card(card_id)?;
        let window = CycleWindow::for_statement_day(card.statement_date, now);

        let mut transactions: Vec<Transaction> = card
            .transactions
            .into_iter()
            .filter(|t| match scope {
                TransactionScope::CurrentCycle => window.in_current(to_local(t.date)),
                TransactionScope::PreviousCycle => window.in_previous(to_local(t.date)),
                TransactionScope::All => true,
            })
            .collect();

        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Remove a transaction, identified by full id or unique id prefix
    pub fn delete(&self, card_id: &CardId, txn: &str) -> WalletResult<Transaction> {
        let mut card = self.card(card_id)?;

        let target = card
            .find_transaction(txn)
            .map(|t| t.id.clone())
            .ok_or_else(|| WalletError::transaction_not_found(txn))?;

        let index = card
            .transactions
            .iter()
            .position(|t| t.id == target)
            .ok_or_else(|| WalletError::transaction_not_found(txn))?;
        let removed = card.transactions.remove(index);

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            removed.id.as_str(),
            Some(format!("{}: {}", card.name, removed.label())),
            &removed,
        )?;

        Ok(removed)
    }
}
