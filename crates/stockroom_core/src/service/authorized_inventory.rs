//! Session-gated inventory access.
//!
//! # Invariants
//! - `update` and `delete` are refused for non-admin sessions before any
//!   storage access.
//! - `list`, `get` and `add` are open to every authenticated session.

use crate::auth::session::Session;
use crate::model::item::{InventoryItem, ItemId};
use crate::repo::inventory_repo::InventoryRepository;
use crate::service::inventory_service::{
    GatedAction, InventoryError, InventoryResult, InventoryService,
};
use log::warn;

/// Inventory service bound to one caller session.
pub struct AuthorizedInventory<'s, R: InventoryRepository> {
    inner: InventoryService<R>,
    session: &'s Session,
}

impl<'s, R: InventoryRepository> AuthorizedInventory<'s, R> {
    pub fn new(repo: R, session: &'s Session) -> Self {
        Self {
            inner: InventoryService::new(repo),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn add(&self, name: &str, quantity: i64) -> InventoryResult<ItemId> {
        self.inner.add(name, quantity)
    }

    pub fn add_from_text(&self, name: &str, quantity_text: &str) -> InventoryResult<ItemId> {
        self.inner.add_from_text(name, quantity_text)
    }

    pub fn list(&self) -> InventoryResult<Vec<InventoryItem>> {
        self.inner.list()
    }

    pub fn get(&self, item_id: ItemId) -> InventoryResult<Option<InventoryItem>> {
        self.inner.get(item_id)
    }

    pub fn update(&self, item_id: ItemId, quantity: i64) -> InventoryResult<()> {
        self.require_admin(GatedAction::Update)?;
        self.inner.update(item_id, quantity)
    }

    pub fn update_from_text(&self, item_id: ItemId, quantity_text: &str) -> InventoryResult<()> {
        self.require_admin(GatedAction::Update)?;
        self.inner.update_from_text(item_id, quantity_text)
    }

    pub fn delete(&self, item_id: ItemId) -> InventoryResult<()> {
        self.require_admin(GatedAction::Delete)?;
        self.inner.delete(item_id)
    }

    fn require_admin(&self, action: GatedAction) -> InventoryResult<()> {
        if self.session.is_admin() {
            return Ok(());
        }

        warn!(
            "event=inventory_{} module=inventory status=denied username={} role={}",
            action.as_str(),
            self.session.username(),
            self.session.role()
        );
        Err(InventoryError::Unauthorized { action })
    }
}
