//! Subscription service
//!
//! Manages the flat monthly charges attached to a card.

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{Card, CardId, Money, Subscription};
use crate::storage::Storage;

/// Service for subscription management
pub struct SubscriptionService<'a> {
    storage: &'a Storage,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new subscription service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn card(&self, card_id: &CardId) -> WalletResult<Card> {
        self.storage
            .cards
            .get(card_id)?
            .ok_or_else(|| WalletError::card_not_found(card_id.as_str()))
    }

    /// Attach a monthly charge to a card
    pub fn add(&self, card_id: &CardId, name: &str, amount: Money) -> WalletResult<Subscription> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WalletError::Validation(
                "Subscription name cannot be empty".into(),
            ));
        }

        if !amount.is_positive() {
            return Err(WalletError::Validation(format!(
                "Subscription amount must be positive (got {})",
                amount.units()
            )));
        }

        let mut card = self.card(card_id)?;
        let sub = Subscription::new(name, amount);

        card.subscriptions.push(sub.clone());
        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::Subscription,
            sub.id.as_str(),
            Some(format!("{}: {}", card.name, sub.name)),
            &sub,
        )?;

        Ok(sub)
    }

    /// List a card's subscriptions in the order they were added
    pub fn list(&self, card_id: &CardId) -> WalletResult<Vec<Subscription>> {
        Ok(self.card(card_id)?.subscriptions)
    }

    /// Remove a subscription, identified by id, id prefix or name
    pub fn delete(&self, card_id: &CardId, sub: &str) -> WalletResult<Subscription> {
        let mut card = self.card(card_id)?;

        let target = card
            .find_subscription(sub)
            .map(|s| s.id.clone())
            .ok_or_else(|| WalletError::subscription_not_found(sub))?;

        let index = card
            .subscriptions
            .iter()
            .position(|s| s.id == target)
            .ok_or_else(|| WalletError::subscription_not_found(sub))?;
        let removed = card.subscriptions.remove(index);

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_delete(
            EntityType::Subscription,
            removed.id.as_str(),
            Some(format!("{}: {}", card.name, removed.name)),
            &removed,
        )?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::WalletPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, CardId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let card = Card::new("Streaming", "Bank", 1, 15);
        let id = card.id.clone();
        storage.cards.upsert(card).unwrap();
        (temp_dir, storage, id)
    }

    #[test]
    fn test_add_and_list() {
        let (_temp_dir, storage, card_id) = create_test_storage();
        let service = SubscriptionService::new(&storage);

        service.add(&card_id, "Netflix", Money::new(390)).unwrap();
        service.add(&card_id, " Spotify ", Money::new(149)).unwrap();

        let subs = service.list(&card_id).unwrap();
        let names: Vec<&str> = subs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Netflix", "Spotify"]);

        let card = storage.cards.get(&card_id).unwrap().unwrap();
        assert_eq!(card.subscription_total(), Money::new(539));
    }

    #[test]
    fn test_add_validation() {
        let (_temp_dir, storage, card_id) = create_test_storage();
        let service = SubscriptionService::new(&storage);

        assert!(service.add(&card_id, "", Money::new(10)).unwrap_err().is_validation());
        assert!(service
            .add(&card_id, "Free Tier", Money::zero())
            .unwrap_err()
            .is_validation());
        assert!(service.list(&card_id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_by_name() {
        let (_temp_dir, storage, card_id) = create_test_storage();
        let service = SubscriptionService::new(&storage);

        service.add(&card_id, "Netflix", Money::new(390)).unwrap();
        let spotify = service.add(&card_id, "Spotify", Money::new(149)).unwrap();

        let removed = service.delete(&card_id, "netflix").unwrap();
        assert_eq!(removed.name, "Netflix");
        assert_eq!(service.list(&card_id).unwrap(), vec![spotify]);

        assert!(service
            .delete(&card_id, "Netflix")
            .unwrap_err()
            .is_not_found());
    }
}
