//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide validated CRUD entry points over an inventory repository.
//! - Map repository failures to caller-facing categories.
//!
//! # Invariants
//! - Quantities `<= 0` are rejected before any storage access.
//! - This service performs no role checks; wrap it in
//!   `AuthorizedInventory` for session-gated access.

use crate::model::item::{parse_quantity, InventoryItem, ItemId, ItemValidationError, NewItem};
use crate::repo::inventory_repo::InventoryRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inventory mutations restricted to admin sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedAction {
    Update,
    Delete,
}

impl GatedAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Service error for inventory use-cases.
#[derive(Debug)]
pub enum InventoryError {
    Validation(ItemValidationError),
    NotFound(ItemId),
    /// Session role does not permit the action.
    Unauthorized { action: GatedAction },
    /// Store could not be opened, was not initialized, or a statement failed.
    StorageUnavailable(RepoError),
}

impl InventoryError {
    /// Text suitable for showing directly to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::NotFound(_) => "That item no longer exists.".to_string(),
            Self::Unauthorized { action } => {
                format!("Only admin users may {} inventory.", action.as_str())
            }
            Self::StorageUnavailable(_) => {
                "Inventory storage is unavailable. Please try again later.".to_string()
            }
        }
    }
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "inventory item not found: {id}"),
            Self::Unauthorized { action } => {
                write!(f, "{} requires an admin session", action.as_str())
            }
            Self::StorageUnavailable(err) => write!(f, "inventory store unavailable: {err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::NotFound(_) | Self::Unauthorized { .. } => None,
        }
    }
}

impl From<ItemValidationError> for InventoryError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for InventoryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::StorageUnavailable(other),
        }
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory service facade over a repository implementation.
pub struct InventoryService<R: InventoryRepository> {
    repo: R,
}

impl<R: InventoryRepository> InventoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one item and returns its store-assigned id.
    pub fn add(&self, name: &str, quantity: i64) -> InventoryResult<ItemId> {
        let item = NewItem::new(name, quantity)?;
        let item_id = self.repo.add_item(&item)?;
        info!(
            "event=inventory_add module=inventory status=ok item_id={} quantity={}",
            item_id,
            item.quantity()
        );
        Ok(item_id)
    }

    /// Adds one item from raw UI text fields.
    pub fn add_from_text(&self, name: &str, quantity_text: &str) -> InventoryResult<ItemId> {
        if name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName.into());
        }
        self.add(name, parse_quantity(quantity_text)?)
    }

    /// Re-reads every row ordered by `item_id`.
    pub fn list(&self) -> InventoryResult<Vec<InventoryItem>> {
        Ok(self.repo.list_items()?)
    }

    pub fn get(&self, item_id: ItemId) -> InventoryResult<Option<InventoryItem>> {
        Ok(self.repo.get_item(item_id)?)
    }

    /// Replaces the quantity of an existing item.
    pub fn update(&self, item_id: ItemId, quantity: i64) -> InventoryResult<()> {
        self.repo.update_quantity(item_id, quantity)?;
        info!(
            "event=inventory_update module=inventory status=ok item_id={} quantity={}",
            item_id, quantity
        );
        Ok(())
    }

    /// Parses grid text input, then replaces the quantity.
    pub fn update_from_text(&self, item_id: ItemId, quantity_text: &str) -> InventoryResult<()> {
        self.update(item_id, parse_quantity(quantity_text)?)
    }

    pub fn delete(&self, item_id: ItemId) -> InventoryResult<()> {
        self.repo.delete_item(item_id)?;
        info!(
            "event=inventory_delete module=inventory status=ok item_id={}",
            item_id
        );
        Ok(())
    }
}
