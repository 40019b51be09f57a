//! Core domain logic for the stockroom inventory app.
//! This crate is the single source of truth for credential and inventory
//! invariants; UI layers call into it and never touch SQL directly.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use auth::password::{PasswordHashError, PasswordHashing};
pub use auth::session::Session;
pub use config::{ConfigError, HashingConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{parse_quantity, InventoryItem, ItemId, ItemValidationError, NewItem};
pub use model::user::{CredentialValidationError, Credentials, Role, User};
pub use repo::inventory_repo::{InventoryRepository, SqliteInventoryRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository, BOOTSTRAP_ADMIN_USERNAME};
pub use repo::{RepoError, RepoResult};
pub use service::authorized_inventory::AuthorizedInventory;
pub use service::credential_service::{
    AuthError, AuthResult, CredentialService, DEFAULT_BOOTSTRAP_ADMIN_PASSWORD,
};
pub use service::inventory_service::{
    GatedAction, InventoryError, InventoryResult, InventoryService,
};
pub use store::{open_store, open_store_in_memory, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
