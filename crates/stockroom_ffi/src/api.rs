//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose login/registration and inventory grid operations to Dart via FRB.
//! - Open the store per call and translate every failure into a user-facing
//!   message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Gated inventory calls always receive the caller's session explicitly.
//! - Only sessions issued by `auth_login` in this process are honored. Role and
//!   username come from the issued session, never from the Dart-side view.

use log::warn;
use stockroom_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_store,
    ping as ping_inner, AuthorizedInventory, CredentialService, InventoryItem, PasswordHashing,
    Session, SqliteInventoryRepository, SqliteUserRepository, StoreConfig,
};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use uuid::Uuid;

const STORE_UNAVAILABLE_MESSAGE: &str = "Storage is unavailable. Please try again later.";
const INVALID_SESSION_MESSAGE: &str = "Your session is invalid. Please sign in again.";

static STORE_CONFIG: OnceLock<Result<StoreConfig, String>> = OnceLock::new();
static ISSUED_SESSIONS: OnceLock<Mutex<HashMap<Uuid, Session>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Session handed to Dart after login and passed back on every grid call.
///
/// Only `session_id` is trusted on the way back in. The other fields are for
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: String,
    pub username: String,
    /// `admin` or `user`.
    pub role: String,
    pub issued_at_ms: i64,
    /// Convenience flag for enabling update/delete buttons.
    pub is_admin: bool,
}

/// One row of the inventory grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub item_id: i64,
    pub item_name: String,
    pub item_quantity: i64,
}

/// Result of login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub ok: bool,
    pub session: Option<SessionView>,
    pub message: String,
}

/// Result of registration and inventory mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Set by `inventory_add` on success.
    pub item_id: Option<i64>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, item_id: Option<i64>) -> Self {
        Self {
            ok: true,
            item_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_id: None,
            message: message.into(),
        }
    }
}

/// Full inventory grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryListResponse {
    pub ok: bool,
    pub items: Vec<InventoryRow>,
    pub message: String,
}

/// Registers a standard user from the login screen.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(username: String, password: String) -> ActionResponse {
    let outcome = with_credentials(|service| {
        service
            .register_self_service(&username, &password)
            .map_err(|err| err.user_message())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Registration successful. You can now sign in.", None),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Validates credentials and returns the session to keep for this app run.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(username: String, password: String) -> LoginResponse {
    let outcome = with_credentials(|service| {
        service
            .login(&username, &password)
            .map_err(|err| err.user_message())
    });
    match outcome {
        Ok(session) => {
            remember_session(&session);
            LoginResponse {
                ok: true,
                message: format!("Login successful ({})", session.role()),
                session: Some(to_session_view(&session)),
            }
        }
        Err(message) => LoginResponse {
            ok: false,
            session: None,
            message,
        },
    }
}

/// Forgets an issued session. Later grid calls with it are refused.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout(session: SessionView) -> ActionResponse {
    match forget_session(&session) {
        Ok(()) => ActionResponse::success("Signed out.", None),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Lists every inventory row ordered by id. Call again after each mutation.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_list(session: SessionView) -> InventoryListResponse {
    let outcome = with_inventory(&session, |inventory| {
        inventory.list().map_err(|err| err.user_message())
    });
    match outcome {
        Ok(items) => InventoryListResponse {
            ok: true,
            message: format!("{} item(s).", items.len()),
            items: items.into_iter().map(to_inventory_row).collect(),
        },
        Err(message) => InventoryListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

/// Adds one row from the grid's name and quantity text fields.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_add(session: SessionView, name: String, quantity_text: String) -> ActionResponse {
    let outcome = with_inventory(&session, |inventory| {
        inventory
            .add_from_text(&name, &quantity_text)
            .map_err(|err| err.user_message())
    });
    match outcome {
        Ok(item_id) => ActionResponse::success("Item added.", Some(item_id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Replaces one row's quantity. Admin sessions only.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_update(session: SessionView, item_id: i64, quantity_text: String) -> ActionResponse {
    let outcome = with_inventory(&session, |inventory| {
        inventory
            .update_from_text(item_id, &quantity_text)
            .map_err(|err| err.user_message())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Item updated.", Some(item_id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Deletes one row. Admin sessions only.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_delete(session: SessionView, item_id: i64) -> ActionResponse {
    let outcome = with_inventory(&session, |inventory| {
        inventory.delete(item_id).map_err(|err| err.user_message())
    });
    match outcome {
        Ok(()) => ActionResponse::success("Item deleted.", Some(item_id)),
        Err(message) => ActionResponse::failure(message),
    }
}

fn store_config() -> Result<&'static StoreConfig, String> {
    STORE_CONFIG
        .get_or_init(|| StoreConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|err| {
            warn!("event=store_config module=ffi status=error error={err}");
            STORE_UNAVAILABLE_MESSAGE.to_string()
        })
}

fn with_credentials<T>(
    f: impl FnOnce(&CredentialService<SqliteUserRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = store_config()?;
    let conn = open_store(config).map_err(store_unavailable)?;
    let repo = SqliteUserRepository::try_new(&conn).map_err(store_unavailable)?;
    let hashing = PasswordHashing::new(config.hashing).map_err(store_unavailable)?;
    f(&CredentialService::new(repo, hashing))
}

fn with_inventory<T>(
    session: &SessionView,
    f: impl FnOnce(&AuthorizedInventory<'_, SqliteInventoryRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let session = resolve_session(session)?;
    let config = store_config()?;
    let conn = open_store(config).map_err(store_unavailable)?;
    let repo = SqliteInventoryRepository::try_new(&conn).map_err(store_unavailable)?;
    f(&AuthorizedInventory::new(repo, &session))
}

fn store_unavailable(err: impl std::fmt::Display) -> String {
    warn!("event=store_open module=ffi status=error error={err}");
    STORE_UNAVAILABLE_MESSAGE.to_string()
}

fn to_session_view(session: &Session) -> SessionView {
    SessionView {
        session_id: session.session_id().to_string(),
        username: session.username().to_string(),
        role: session.role().as_str().to_string(),
        issued_at_ms: session.issued_at_ms(),
        is_admin: session.is_admin(),
    }
}

fn issued_sessions() -> std::sync::MutexGuard<'static, HashMap<Uuid, Session>> {
    ISSUED_SESSIONS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn remember_session(session: &Session) {
    issued_sessions().insert(session.session_id(), session.clone());
}

fn parse_session_id(view: &SessionView) -> Result<Uuid, String> {
    Uuid::parse_str(view.session_id.trim()).map_err(|_| INVALID_SESSION_MESSAGE.to_string())
}

fn resolve_session(view: &SessionView) -> Result<Session, String> {
    let session_id = parse_session_id(view)?;
    let issued = issued_sessions().get(&session_id).cloned();
    match issued {
        Some(session) if session.username() == view.username => Ok(session),
        _ => {
            warn!("event=session_resolve module=ffi status=rejected session_id={session_id}");
            Err(INVALID_SESSION_MESSAGE.to_string())
        }
    }
}

fn forget_session(view: &SessionView) -> Result<(), String> {
    let session_id = parse_session_id(view)?;
    match issued_sessions().remove(&session_id) {
        Some(_) => Ok(()),
        None => Err(INVALID_SESSION_MESSAGE.to_string()),
    }
}

fn to_inventory_row(item: InventoryItem) -> InventoryRow {
    InventoryRow {
        item_id: item.item_id,
        item_name: item.item_name,
        item_quantity: item.item_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        auth_login, auth_logout, auth_register, core_version, init_logging, inventory_add,
        inventory_delete, inventory_list, inventory_update, ping, SessionView, STORE_CONFIG,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use stockroom_core::{HashingConfig, StoreConfig};
    use tempfile::TempDir;
    use uuid::Uuid;

    const TEST_ADMIN_PASSWORD: &str = "test-admin-pass";
    static TEST_DIR: OnceLock<TempDir> = OnceLock::new();

    fn use_test_store() {
        let dir = TEST_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        let _ = STORE_CONFIG.get_or_init(|| {
            Ok(StoreConfig {
                db_path: dir.path().join("stockroom_ffi.sqlite3"),
                bootstrap_admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
                hashing: HashingConfig::new(64, 1, 1).expect("cheap hashing params"),
            })
        });
    }

    fn unique_username(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}{nanos}")
    }

    fn admin_session() -> SessionView {
        use_test_store();
        let response = auth_login("admin".to_string(), TEST_ADMIN_PASSWORD.to_string());
        assert!(response.ok, "{}", response.message);
        response.session.expect("login should return a session")
    }

    fn user_session() -> SessionView {
        use_test_store();
        let username = unique_username("user");
        let registered = auth_register(username.clone(), "secret1".to_string());
        assert!(registered.ok, "{}", registered.message);
        let response = auth_login(username, "secret1".to_string());
        assert!(response.ok, "{}", response.message);
        response.session.expect("login should return a session")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn login_reports_role_and_rejects_bad_password() {
        let admin = admin_session();
        assert_eq!(admin.role, "admin");
        assert!(admin.is_admin);

        let rejected = auth_login("admin".to_string(), "not-the-password".to_string());
        assert!(!rejected.ok);
        assert!(rejected.session.is_none());
        assert_eq!(rejected.message, "Invalid username or password.");
    }

    #[test]
    fn register_rejects_duplicates_and_bad_input() {
        use_test_store();
        let username = unique_username("dup");
        assert!(auth_register(username.clone(), "secret1".to_string()).ok);

        let duplicate = auth_register(username, "secret1".to_string());
        assert!(!duplicate.ok);
        assert_eq!(duplicate.message, "Username already exists.");

        let spaced = auth_register("has space".to_string(), "secret1".to_string());
        assert_eq!(spaced.message, "Username cannot contain spaces.");
    }

    #[test]
    fn admin_can_add_update_and_delete_rows() {
        let admin = admin_session();

        let added = inventory_add(admin.clone(), "Widget".to_string(), "10".to_string());
        assert!(added.ok, "{}", added.message);
        let item_id = added.item_id.expect("add should return item id");

        let updated = inventory_update(admin.clone(), item_id, "5".to_string());
        assert!(updated.ok, "{}", updated.message);
        let listed = inventory_list(admin.clone());
        assert!(listed
            .items
            .iter()
            .any(|row| row.item_id == item_id && row.item_quantity == 5));

        let deleted = inventory_delete(admin.clone(), item_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!inventory_list(admin).items.iter().any(|row| row.item_id == item_id));
    }

    #[test]
    fn standard_user_is_refused_update_and_delete() {
        let user = user_session();
        assert!(!user.is_admin);

        let added = inventory_add(user.clone(), "Gadget".to_string(), "3".to_string());
        assert!(added.ok, "{}", added.message);
        let item_id = added.item_id.expect("add should return item id");

        let update = inventory_update(user.clone(), item_id, "1".to_string());
        assert!(!update.ok);
        assert_eq!(update.message, "Only admin users may update inventory.");

        let delete = inventory_delete(user.clone(), item_id);
        assert!(!delete.ok);
        assert_eq!(delete.message, "Only admin users may delete inventory.");

        assert!(inventory_list(user)
            .items
            .iter()
            .any(|row| row.item_id == item_id && row.item_quantity == 3));
    }

    #[test]
    fn quantity_text_is_validated() {
        let admin = admin_session();

        let zero = inventory_add(admin.clone(), "Bad".to_string(), "0".to_string());
        assert!(!zero.ok);
        assert_eq!(zero.message, "Quantity must be a positive number.");

        let garbage = inventory_add(admin.clone(), "Bad".to_string(), "ten".to_string());
        assert_eq!(garbage.message, "Please enter a valid number for quantity.");

        let update = inventory_update(admin, 1, "-2".to_string());
        assert!(!update.ok);
    }

    #[test]
    fn forged_session_is_rejected() {
        use_test_store();
        let forged = SessionView {
            session_id: "not-a-uuid".to_string(),
            username: "admin".to_string(),
            role: "admin".to_string(),
            issued_at_ms: 0,
            is_admin: true,
        };
        let response = inventory_list(forged);
        assert!(!response.ok);
        assert!(response.message.contains("sign in again"));
    }

    #[test]
    fn never_issued_admin_session_is_rejected() {
        let admin = admin_session();
        let added = inventory_add(admin, "Keep".to_string(), "4".to_string());
        let item_id = added.item_id.expect("add should return item id");

        let fabricated = SessionView {
            session_id: Uuid::new_v4().to_string(),
            username: "nobody".to_string(),
            role: "admin".to_string(),
            issued_at_ms: 0,
            is_admin: true,
        };
        let deleted = inventory_delete(fabricated.clone(), item_id);
        assert!(!deleted.ok);
        assert!(deleted.message.contains("sign in again"));
        assert!(!inventory_update(fabricated, item_id, "1".to_string()).ok);
    }

    #[test]
    fn role_comes_from_issued_session_not_view() {
        let mut user = user_session();
        let added = inventory_add(user.clone(), "Crate".to_string(), "2".to_string());
        let item_id = added.item_id.expect("add should return item id");

        user.role = "admin".to_string();
        user.is_admin = true;
        let deleted = inventory_delete(user.clone(), item_id);
        assert!(!deleted.ok);
        assert_eq!(deleted.message, "Only admin users may delete inventory.");

        let negative = inventory_update(user, item_id, "-2".to_string());
        assert_eq!(negative.message, "Only admin users may update inventory.");
    }

    #[test]
    fn logout_revokes_session() {
        let user = user_session();
        assert!(inventory_list(user.clone()).ok);

        assert!(auth_logout(user.clone()).ok);
        let listed = inventory_list(user.clone());
        assert!(!listed.ok);
        assert!(listed.message.contains("sign in again"));
        assert!(!auth_logout(user).ok);
    }
}
