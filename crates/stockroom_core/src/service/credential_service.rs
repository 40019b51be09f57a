//! Credential use-case service.
//!
//! # Responsibility
//! - Register users, validate passwords and report roles.
//! - Seed the bootstrap admin account once per store.
//! - Issue explicit `Session` values on successful login.
//!
//! # Invariants
//! - Passwords are hashed before reaching the repository.
//! - Login failure never reveals whether the username or password was wrong.
//! - `role_of` falls back to `Role::User` for unknown names; it is display
//!   data, not authentication.

use crate::auth::password::{PasswordHashError, PasswordHashing};
use crate::auth::session::Session;
use crate::model::user::{CredentialValidationError, Credentials, Role, User};
use crate::repo::user_repo::{UserRepository, BOOTSTRAP_ADMIN_USERNAME};
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Password used for the seeded `admin` account when none is configured.
pub const DEFAULT_BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Service error for credential use-cases.
#[derive(Debug)]
pub enum AuthError {
    Validation(CredentialValidationError),
    /// Registration target username already exists.
    Duplicate(String),
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// Store could not be opened, was not initialized, or a statement failed.
    StorageUnavailable(RepoError),
    Hashing(PasswordHashError),
}

impl AuthError {
    /// Text suitable for showing directly to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Duplicate(_) => "Username already exists.".to_string(),
            Self::InvalidCredentials => "Invalid username or password.".to_string(),
            Self::StorageUnavailable(_) | Self::Hashing(_) => {
                "Account storage is unavailable. Please try again later.".to_string()
            }
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(username) => write!(f, "user already exists: {username}"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::StorageUnavailable(err) => write!(f, "credential store unavailable: {err}"),
            Self::Hashing(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::Hashing(err) => Some(err),
            Self::Duplicate(_) | Self::InvalidCredentials => None,
        }
    }
}

impl From<CredentialValidationError> for AuthError {
    fn from(value: CredentialValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hashing(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateUser(username) => Self::Duplicate(username),
            other => Self::StorageUnavailable(other),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Credential service facade over a user repository.
pub struct CredentialService<R: UserRepository> {
    repo: R,
    hashing: PasswordHashing,
}

impl<R: UserRepository> CredentialService<R> {
    pub fn new(repo: R, hashing: PasswordHashing) -> Self {
        Self { repo, hashing }
    }

    /// Seeds the bootstrap admin on first initialization only.
    ///
    /// Returns `true` when this call created the account. `None` uses
    /// `DEFAULT_BOOTSTRAP_ADMIN_PASSWORD`. The password is trimmed and held to
    /// the registration rules so the seeded account can always sign in.
    pub fn initialize(&self, bootstrap_password: Option<&str>) -> AuthResult<bool> {
        if self.repo.bootstrap_admin_seeded()? {
            return Ok(false);
        }

        let password = match bootstrap_password {
            Some(password) => password,
            None => {
                warn!(
                    "event=bootstrap_admin module=auth status=default_password username=admin"
                );
                DEFAULT_BOOTSTRAP_ADMIN_PASSWORD
            }
        };

        let credentials = Credentials::for_registration(BOOTSTRAP_ADMIN_USERNAME, password)?;
        let hash = self.hashing.hash(credentials.password())?;
        let seeded = self.repo.seed_bootstrap_admin(&hash)?;
        if seeded {
            info!("event=bootstrap_admin module=auth status=seeded username=admin");
        }
        Ok(seeded)
    }

    /// Exact, case-sensitive existence check.
    pub fn user_exists(&self, username: &str) -> AuthResult<bool> {
        Ok(self.repo.user_exists(username)?)
    }

    /// Registers a user with an explicit role.
    ///
    /// Self-service callers go through `register_self_service`, which always
    /// assigns `Role::User`.
    pub fn register(&self, username: &str, raw_password: &str, role: Role) -> AuthResult<()> {
        let credentials = Credentials::for_registration(username, raw_password)?;

        let reserved = credentials.username() == BOOTSTRAP_ADMIN_USERNAME
            && !self.repo.bootstrap_admin_seeded()?;
        if reserved || self.repo.user_exists(credentials.username())? {
            info!("event=auth_register module=auth status=duplicate");
            return Err(AuthError::Duplicate(credentials.username().to_string()));
        }

        let hash = self.hashing.hash(credentials.password())?;
        self.repo
            .insert_user(credentials.username(), &hash, role)?;

        info!(
            "event=auth_register module=auth status=ok username={} role={}",
            credentials.username(),
            role
        );
        Ok(())
    }

    /// Registration entry point for the login screen.
    pub fn register_self_service(&self, username: &str, raw_password: &str) -> AuthResult<()> {
        self.register(username, raw_password, Role::User)
    }

    /// Returns whether `raw_password` matches the stored hash for `username`.
    pub fn validate(&self, username: &str, raw_password: &str) -> AuthResult<bool> {
        let Some(stored_hash) = self.repo.find_password_hash(username)? else {
            return Ok(false);
        };
        Ok(self.hashing.verify(raw_password, &stored_hash))
    }

    /// Stored role of `username`, or `Role::User` when the user is unknown.
    pub fn role_of(&self, username: &str) -> AuthResult<Role> {
        Ok(self.repo.find_role(username)?.unwrap_or_default())
    }

    /// Display record for `username`, or `None` when unknown.
    pub fn get_user(&self, username: &str) -> AuthResult<Option<User>> {
        let role = self.repo.find_role(username)?;
        Ok(role.map(|role| User {
            username: username.to_string(),
            role,
        }))
    }

    /// Validates credentials and issues a session carrying the stored role.
    pub fn login(&self, username: &str, raw_password: &str) -> AuthResult<Session> {
        let credentials = Credentials::for_login(username, raw_password)?;

        if !self.validate(credentials.username(), credentials.password())? {
            info!("event=auth_login module=auth status=rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let role = self.role_of(credentials.username())?;
        info!(
            "event=auth_login module=auth status=ok username={} role={}",
            credentials.username(),
            role
        );
        Ok(Session::issue(credentials.username(), role))
    }
}
