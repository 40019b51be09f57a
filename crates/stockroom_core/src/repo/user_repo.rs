//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist user identity rows (`username`, `password_hash`, `role`).
//! - Record the one-shot bootstrap admin seed in `store_meta`.
//!
//! # Invariants
//! - Usernames are matched exactly (case-sensitive).
//! - Insert runs existence check and write in one `IMMEDIATE` transaction.
//! - Only already-hashed passwords reach this layer.

use crate::db::ensure_connection_ready;
use crate::model::user::Role;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};

/// Username of the seeded administrative account.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
const BOOTSTRAP_SEEDED_KEY: &str = "bootstrap_admin_seeded";

/// Repository interface for user identity storage.
pub trait UserRepository {
    fn user_exists(&self, username: &str) -> RepoResult<bool>;
    /// Inserts a new user, failing with `DuplicateUser` when the name is taken.
    fn insert_user(&self, username: &str, password_hash: &str, role: Role) -> RepoResult<()>;
    fn find_password_hash(&self, username: &str) -> RepoResult<Option<String>>;
    fn find_role(&self, username: &str) -> RepoResult<Option<Role>>;
    fn bootstrap_admin_seeded(&self) -> RepoResult<bool>;
    /// Seeds the bootstrap admin once. Returns `false` when already seeded.
    ///
    /// Fails without recording the seed when the bootstrap username is
    /// already held by another account.
    fn seed_bootstrap_admin(&self, password_hash: &str) -> RepoResult<bool>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users", "store_meta"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn user_exists(&self, username: &str) -> RepoResult<bool> {
        user_exists_on(self.conn, username)
    }

    fn insert_user(&self, username: &str, password_hash: &str, role: Role) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if user_exists_on(&tx, username)? {
            return Err(RepoError::DuplicateUser(username.to_string()));
        }

        let inserted = tx.execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3);",
            params![username, password_hash, role.as_str()],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(RepoError::DuplicateUser(username.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit()?;
        Ok(())
    }

    fn find_password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?1;",
                [username],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(hash)
    }

    fn find_role(&self, username: &str) -> RepoResult<Option<Role>> {
        let stored = self
            .conn
            .query_row(
                "SELECT role FROM users WHERE username = ?1;",
                [username],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        stored
            .map(|value| {
                Role::from_db(&value).ok_or_else(|| {
                    RepoError::InvalidData(format!("invalid role `{value}` in users.role"))
                })
            })
            .transpose()
    }

    fn bootstrap_admin_seeded(&self) -> RepoResult<bool> {
        seed_marker_exists(self.conn)
    }

    fn seed_bootstrap_admin(&self, password_hash: &str) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if seed_marker_exists(&tx)? {
            return Ok(false);
        }

        if user_exists_on(&tx, BOOTSTRAP_ADMIN_USERNAME)? {
            return Err(RepoError::InvalidData(format!(
                "bootstrap username `{BOOTSTRAP_ADMIN_USERNAME}` is already taken"
            )));
        }
        tx.execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3);",
            params![BOOTSTRAP_ADMIN_USERNAME, password_hash, Role::Admin.as_str()],
        )?;
        tx.execute(
            "INSERT INTO store_meta (key, value) VALUES (?1, strftime('%s', 'now'));",
            [BOOTSTRAP_SEEDED_KEY],
        )?;
        tx.commit()?;

        Ok(true)
    }
}

fn user_exists_on(conn: &Connection, username: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);",
        [username],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn seed_marker_exists(conn: &Connection) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM store_meta WHERE key = ?1);",
        [BOOTSTRAP_SEEDED_KEY],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
