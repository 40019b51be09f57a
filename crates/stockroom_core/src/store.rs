//! One-call store bootstrap for callers that open the store per operation.
//!
//! # Responsibility
//! - Open the configured database with migrations applied.
//! - Run credential initialization (bootstrap admin seed).
//!
//! # Invariants
//! - A connection returned from here is ready for every repository.
//! - Seeding happens at most once per database file.

use crate::auth::password::PasswordHashing;
use crate::config::{ConfigError, StoreConfig};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::credential_service::{AuthError, CredentialService};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store bootstrap failure. Every variant means the store is unavailable.
#[derive(Debug)]
pub enum StoreError {
    Config(ConfigError),
    Db(DbError),
    Initialize(AuthError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Initialize(err) => write!(f, "store initialization failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Initialize(err) => Some(err),
        }
    }
}

impl From<ConfigError> for StoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<AuthError> for StoreError {
    fn from(value: AuthError) -> Self {
        Self::Initialize(value)
    }
}

/// Opens `config.db_path` and seeds the bootstrap admin when needed.
pub fn open_store(config: &StoreConfig) -> Result<Connection, StoreError> {
    let conn = open_db(&config.db_path)?;
    initialize_credentials(&conn, config)?;
    Ok(conn)
}

/// In-memory variant of `open_store`, used by tests and probes.
pub fn open_store_in_memory(config: &StoreConfig) -> Result<Connection, StoreError> {
    let conn = open_db_in_memory()?;
    initialize_credentials(&conn, config)?;
    Ok(conn)
}

fn initialize_credentials(conn: &Connection, config: &StoreConfig) -> Result<(), StoreError> {
    let repo = SqliteUserRepository::try_new(conn).map_err(AuthError::from)?;
    let service = CredentialService::new(repo, PasswordHashing::new(config.hashing)?);
    service.initialize(config.bootstrap_admin_password.as_deref())?;
    Ok(())
}
