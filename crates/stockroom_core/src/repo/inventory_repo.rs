//! Inventory repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `inventory` relation.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Quantities written are always strictly positive.
//! - Listing is a full re-read ordered by `item_id ASC`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::ensure_connection_ready;
use crate::model::item::{validate_quantity, InventoryItem, ItemId, NewItem};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    item_id,
    item_name,
    item_quantity
FROM inventory";

/// Repository interface for inventory CRUD operations.
pub trait InventoryRepository {
    fn add_item(&self, item: &NewItem) -> RepoResult<ItemId>;
    fn list_items(&self) -> RepoResult<Vec<InventoryItem>>;
    fn get_item(&self, item_id: ItemId) -> RepoResult<Option<InventoryItem>>;
    fn update_quantity(&self, item_id: ItemId, quantity: i64) -> RepoResult<()>;
    fn delete_item(&self, item_id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed inventory repository.
pub struct SqliteInventoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInventoryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["inventory"])?;
        Ok(Self { conn })
    }
}

impl InventoryRepository for SqliteInventoryRepository<'_> {
    fn add_item(&self, item: &NewItem) -> RepoResult<ItemId> {
        self.conn.execute(
            "INSERT INTO inventory (item_name, item_quantity) VALUES (?1, ?2);",
            params![item.name(), item.quantity()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_items(&self) -> RepoResult<Vec<InventoryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY item_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn get_item(&self, item_id: ItemId) -> RepoResult<Option<InventoryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE item_id = ?1;"))?;
        let mut rows = stmt.query([item_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn update_quantity(&self, item_id: ItemId, quantity: i64) -> RepoResult<()> {
        let quantity = validate_quantity(quantity)?;

        let changed = self.conn.execute(
            "UPDATE inventory SET item_quantity = ?1 WHERE item_id = ?2;",
            params![quantity, item_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item_id));
        }

        Ok(())
    }

    fn delete_item(&self, item_id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM inventory WHERE item_id = ?1;", [item_id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(item_id));
        }

        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<InventoryItem> {
    let item_id: ItemId = row.get("item_id")?;
    let item_quantity: i64 = row.get("item_quantity")?;
    if item_quantity <= 0 {
        return Err(RepoError::InvalidData(format!(
            "non-positive quantity `{item_quantity}` for item {item_id}"
        )));
    }

    Ok(InventoryItem {
        item_id,
        item_name: row.get("item_name")?,
        item_quantity,
    })
}

