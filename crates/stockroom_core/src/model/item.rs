//! Inventory line item model.
//!
//! # Invariants
//! - `item_name` is non-empty after trimming.
//! - `item_quantity` is strictly positive on every write.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned, monotonically increasing item identifier.
pub type ItemId = i64;

/// One persisted inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    pub item_name: String,
    pub item_quantity: i64,
}

/// Validated input for creating an inventory row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    quantity: i64,
}

impl NewItem {
    pub fn new(name: &str, quantity: i64) -> Result<Self, ItemValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            quantity: validate_quantity(quantity)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Rejected inventory input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    /// Quantity text is empty or not an integer.
    InvalidQuantity(String),
    NonPositiveQuantity(i64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Please enter an item name and quantity."),
            Self::InvalidQuantity(_) => write!(f, "Please enter a valid number for quantity."),
            Self::NonPositiveQuantity(_) => write!(f, "Quantity must be a positive number."),
        }
    }
}

impl Error for ItemValidationError {}

/// Accepts only quantities greater than zero.
pub fn validate_quantity(quantity: i64) -> Result<i64, ItemValidationError> {
    if quantity <= 0 {
        return Err(ItemValidationError::NonPositiveQuantity(quantity));
    }
    Ok(quantity)
}

/// Parses quantity text typed into the UI.
pub fn parse_quantity(text: &str) -> Result<i64, ItemValidationError> {
    let trimmed = text.trim();
    let quantity = trimmed
        .parse::<i64>()
        .map_err(|_| ItemValidationError::InvalidQuantity(trimmed.to_string()))?;
    validate_quantity(quantity)
}
