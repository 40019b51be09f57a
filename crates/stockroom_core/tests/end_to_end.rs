//! Login-to-inventory flows as the presentation layer drives them.

use rusqlite::Connection;
use stockroom_core::{
    open_store_in_memory, AuthorizedInventory, CredentialService, HashingConfig, InventoryError,
    InventoryItem, ItemValidationError, PasswordHashing, Role, SqliteInventoryRepository,
    SqliteUserRepository, StoreConfig, DEFAULT_BOOTSTRAP_ADMIN_PASSWORD,
};

fn cheap_config() -> StoreConfig {
    StoreConfig {
        hashing: HashingConfig::new(64, 1, 1).unwrap(),
        ..StoreConfig::default()
    }
}

fn credentials(conn: &Connection) -> CredentialService<SqliteUserRepository<'_>> {
    let hashing = PasswordHashing::new(cheap_config().hashing).unwrap();
    CredentialService::new(SqliteUserRepository::try_new(conn).unwrap(), hashing)
}

#[test]
fn self_registered_user_logs_in_with_user_role() {
    let conn = open_store_in_memory(&cheap_config()).unwrap();
    let auth = credentials(&conn);

    auth.register("alice", "secret1", Role::User).unwrap();
    assert!(auth.validate("alice", "secret1").unwrap());
    assert_eq!(auth.role_of("alice").unwrap().as_str(), "user");
}

#[test]
fn admin_runs_full_inventory_lifecycle() {
    let conn = open_store_in_memory(&cheap_config()).unwrap();
    let session = credentials(&conn)
        .login("admin", DEFAULT_BOOTSTRAP_ADMIN_PASSWORD)
        .unwrap();
    let inventory =
        AuthorizedInventory::new(SqliteInventoryRepository::try_new(&conn).unwrap(), &session);

    assert_eq!(inventory.add("Widget", 10).unwrap(), 1);
    assert_eq!(
        inventory.list().unwrap(),
        vec![InventoryItem {
            item_id: 1,
            item_name: "Widget".to_string(),
            item_quantity: 10,
        }]
    );

    inventory.update(1, 5).unwrap();
    assert_eq!(inventory.list().unwrap()[0].item_quantity, 5);

    inventory.delete(1).unwrap();
    assert!(inventory.list().unwrap().is_empty());
}

#[test]
fn non_admin_delete_is_refused_and_row_survives() {
    let conn = open_store_in_memory(&cheap_config()).unwrap();
    let auth = credentials(&conn);
    auth.register_self_service("bob", "secret1").unwrap();

    let admin = auth.login("admin", DEFAULT_BOOTSTRAP_ADMIN_PASSWORD).unwrap();
    AuthorizedInventory::new(SqliteInventoryRepository::try_new(&conn).unwrap(), &admin)
        .add("Widget", 10)
        .unwrap();

    let bob = auth.login("bob", "secret1").unwrap();
    let inventory =
        AuthorizedInventory::new(SqliteInventoryRepository::try_new(&conn).unwrap(), &bob);
    assert!(matches!(
        inventory.delete(1),
        Err(InventoryError::Unauthorized { .. })
    ));
    assert_eq!(inventory.list().unwrap().len(), 1);
}

#[test]
fn zero_quantity_add_leaves_inventory_empty() {
    let conn = open_store_in_memory(&cheap_config()).unwrap();
    let session = credentials(&conn)
        .login("admin", DEFAULT_BOOTSTRAP_ADMIN_PASSWORD)
        .unwrap();
    let inventory =
        AuthorizedInventory::new(SqliteInventoryRepository::try_new(&conn).unwrap(), &session);

    assert!(matches!(
        inventory.add("Bad", 0),
        Err(InventoryError::Validation(
            ItemValidationError::NonPositiveQuantity(0)
        ))
    ));
    assert!(inventory.list().unwrap().is_empty());
}
