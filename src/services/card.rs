//! Card service
//!
//! Provides business logic for card management including CRUD operations,
//! validation, billing-cycle summaries and custom card images.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{NaiveDate, NaiveDateTime};

use crate::audit::EntityType;
use crate::error::{WalletError, WalletResult};
use crate::models::{Card, CardId, CardNetwork, CardTheme, Money};
use crate::storage::Storage;

use super::cycle::{self, CycleSummary};

/// Largest image accepted as a card background
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Service for card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

/// Input for creating a card
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub name: String,
    pub bank_name: String,
    pub network: Option<CardNetwork>,
    pub expiry_date: String,
    pub statement_date: u32,
    pub due_date: u32,
    pub credit_limit: Option<Money>,
    pub rewards_info: String,
    pub reward_cap: String,
    pub applicable_channels: Option<String>,
    pub annual_fee_condition: String,
    pub theme: CardTheme,
}

/// Field changes for an existing card; `None` leaves a field untouched
///
/// For the optional card fields an empty string clears the value.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub name: Option<String>,
    pub bank_name: Option<String>,
    pub network: Option<CardNetwork>,
    pub expiry_date: Option<String>,
    pub statement_date: Option<u32>,
    pub due_date: Option<u32>,
    pub credit_limit: Option<Money>,
    pub rewards_info: Option<String>,
    pub reward_cap: Option<String>,
    pub applicable_channels: Option<String>,
    pub annual_fee_condition: Option<String>,
    pub theme: Option<CardTheme>,
}

impl CardPatch {
    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bank_name.is_none()
            && self.network.is_none()
            && self.expiry_date.is_none()
            && self.statement_date.is_none()
            && self.due_date.is_none()
            && self.credit_limit.is_none()
            && self.rewards_info.is_none()
            && self.reward_cap.is_none()
            && self.applicable_channels.is_none()
            && self.annual_fee_condition.is_none()
            && self.theme.is_none()
    }

    fn apply(self, card: &mut Card) {
        if let Some(name) = self.name {
            card.name = name.trim().to_string();
        }
        if let Some(bank_name) = self.bank_name {
            card.bank_name = bank_name.trim().to_string();
        }
        if let Some(network) = self.network {
            card.network = Some(network);
        }
        if let Some(expiry) = self.expiry_date {
            card.expiry_date = expiry.trim().to_string();
        }
        if let Some(day) = self.statement_date {
            card.statement_date = day;
        }
        if let Some(day) = self.due_date {
            card.due_date = day;
        }
        if let Some(limit) = self.credit_limit {
            card.credit_limit = (!limit.is_zero()).then_some(limit);
        }
        if let Some(rewards) = self.rewards_info {
            card.rewards_info = rewards;
        }
        if let Some(cap) = self.reward_cap {
            card.reward_cap = cap;
        }
        if let Some(channels) = self.applicable_channels {
            card.applicable_channels = non_blank(channels);
        }
        if let Some(fee) = self.annual_fee_condition {
            card.annual_fee_condition = fee;
        }
        if let Some(theme) = self.theme {
            card.theme = theme;
        }
    }
}

/// A card with its computed billing-cycle figures
#[derive(Debug, Clone)]
pub struct CardSummary {
    pub card: Card,
    pub cycle: CycleSummary,
    pub next_due: NaiveDate,
    pub days_until_due: i64,
}

impl CardSummary {
    /// Whether the payment is due within `threshold` days
    pub fn is_due_soon(&self, threshold: i64) -> bool {
        (0..=threshold).contains(&self.days_until_due)
    }
}

impl<'a> CardService<'a> {
    /// Create a new card service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new card
    pub fn create(&self, input: NewCard) -> WalletResult<Card> {
        let name = input.name.trim();

        if self.storage.cards.name_exists(name, None)? {
            return Err(WalletError::Duplicate {
                entity_type: "Card",
                identifier: name.to_string(),
            });
        }

        let mut card = Card::new(
            name,
            input.bank_name.trim(),
            input.statement_date,
            input.due_date,
        );
        card.network = input.network;
        card.expiry_date = input.expiry_date.trim().to_string();
        card.credit_limit = input.credit_limit.filter(|limit| !limit.is_zero());
        card.rewards_info = input.rewards_info;
        card.reward_cap = input.reward_cap;
        card.applicable_channels = input.applicable_channels.and_then(non_blank);
        card.annual_fee_condition = input.annual_fee_condition;
        card.theme = input.theme;

        card.validate()
            .map_err(|e| WalletError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::Card,
            card.id.as_str(),
            Some(card.name.clone()),
            &card,
        )?;

        Ok(card)
    }

    /// Get a card by ID
    pub fn get(&self, id: &CardId) -> WalletResult<Option<Card>> {
        self.storage.cards.get(id)
    }

    /// Find a card by name, full ID or unique ID prefix
    pub fn find(&self, identifier: &str) -> WalletResult<Option<Card>> {
        if let Some(card) = self.storage.cards.get_by_name(identifier)? {
            return Ok(Some(card));
        }

        if let Ok(id) = identifier.parse::<CardId>() {
            if let Some(card) = self.storage.cards.get(&id)? {
                return Ok(Some(card));
            }
        }

        self.storage.cards.get_by_id_prefix(identifier)
    }

    /// Find a card or fail with a "not found" error
    pub fn require(&self, identifier: &str) -> WalletResult<Card> {
        self.find(identifier)?
            .ok_or_else(|| WalletError::card_not_found(identifier))
    }

    /// Get all cards in collection order
    pub fn list(&self) -> WalletResult<Vec<Card>> {
        self.storage.cards.get_all()
    }

    /// Get all cards with their cycle figures
    pub fn list_with_summaries(&self, now: NaiveDateTime) -> WalletResult<Vec<CardSummary>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|card| self.summary(card, now))
            .collect())
    }

    /// Compute cycle totals and the next payment for a card
    pub fn summary(&self, card: Card, now: NaiveDateTime) -> CardSummary {
        CardSummary {
            cycle: CycleSummary::for_card(&card, now),
            next_due: cycle::next_due_date(card.due_date, now),
            days_until_due: cycle::days_until_due(card.due_date, now),
            card,
        }
    }

    /// Update a card's details
    pub fn update(&self, id: &CardId, patch: CardPatch) -> WalletResult<Card> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| WalletError::card_not_found(id.as_str()))?;

        if patch.is_empty() {
            return Err(WalletError::Validation("No changes given".into()));
        }

        if let Some(name) = &patch.name {
            if self.storage.cards.name_exists(name, Some(id))? {
                return Err(WalletError::Duplicate {
                    entity_type: "Card",
                    identifier: name.trim().to_string(),
                });
            }
        }

        let before = card.clone();
        patch.apply(&mut card);

        card.validate()
            .map_err(|e| WalletError::Validation(e.to_string()))?;

        self.save_update(&before, card)
    }

    /// Delete a card together with its transactions and subscriptions
    pub fn delete(&self, id: &CardId) -> WalletResult<Card> {
        let card = self
            .storage
            .cards
            .delete(id)?
            .ok_or_else(|| WalletError::card_not_found(id.as_str()))?;

        self.storage.cards.save()?;

        self.storage.log_delete(
            EntityType::Card,
            card.id.as_str(),
            Some(card.name.clone()),
            &card,
        )?;

        Ok(card)
    }

    /// Use an image file as the card face
    pub fn set_background_image(&self, id: &CardId, image: &Path) -> WalletResult<Card> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| WalletError::card_not_found(id.as_str()))?;

        let before = card.clone();
        card.background_image = Some(image_data_url(image)?);

        self.save_update(&before, card)
    }

    /// Go back to the themed card face
    pub fn clear_background_image(&self, id: &CardId) -> WalletResult<Card> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| WalletError::card_not_found(id.as_str()))?;

        if card.background_image.is_none() {
            return Err(WalletError::Validation(
                "Card has no background image".into(),
            ));
        }

        let before = card.clone();
        card.background_image = None;

        self.save_update(&before, card)
    }

    fn save_update(&self, before: &Card, card: Card) -> WalletResult<Card> {
        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::Card,
            card.id.as_str(),
            Some(card.name.clone()),
            before,
            &card,
        )?;

        Ok(card)
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// MIME type for an image, from its file extension
fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Read an image file into a `data:` URL
fn image_data_url(path: &Path) -> WalletResult<String> {
    let mime = image_mime_type(path).ok_or_else(|| {
        WalletError::Validation(format!(
            "Unsupported image type: {} (use png, jpg, gif, webp or svg)",
            path.display()
        ))
    })?;

    let size = std::fs::metadata(path)
        .map_err(|e| WalletError::Io(format!("Failed to read {}: {}", path.display(), e)))?
        .len();
    if size > MAX_IMAGE_BYTES {
        return Err(WalletError::Validation(format!(
            "Image is too large ({} bytes, max {})",
            size, MAX_IMAGE_BYTES
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| WalletError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
