use rusqlite::Connection;
use stockroom_core::db::migrations::latest_version;
use stockroom_core::db::{open_db, open_db_in_memory, DbError};
use stockroom_core::{RepoError, SqliteInventoryRepository, SqliteUserRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "store_meta");
    assert_table_exists(&conn, "inventory");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockroom.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO inventory (item_name, item_quantity) VALUES ('Widget', 3);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM inventory;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_non_positive_quantity_and_unknown_role() {
    let conn = open_db_in_memory().unwrap();

    assert!(conn
        .execute(
            "INSERT INTO inventory (item_name, item_quantity) VALUES ('Bad', 0);",
            [],
        )
        .is_err());
    assert!(conn
        .execute(
            "INSERT INTO users (username, password_hash, role) VALUES ('eve', 'x', 'root');",
            [],
        )
        .is_err());
}

#[test]
fn repositories_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteInventoryRepository::try_new(&conn) {
        Err(RepoError::Db(DbError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        })) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }

    assert!(matches!(
        SqliteUserRepository::try_new(&conn),
        Err(RepoError::Db(DbError::UninitializedConnection { .. }))
    ));
}

#[test]
fn repositories_reject_missing_tables() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE inventory;").unwrap();

    assert!(matches!(
        SqliteInventoryRepository::try_new(&conn),
        Err(RepoError::Db(DbError::MissingRequiredTable("inventory")))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
