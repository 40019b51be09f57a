//! User identity model and credential input rules.
//!
//! # Responsibility
//! - Define the `Role` authorization tier and the `User` read model.
//! - Normalize and validate raw credential input from login/registration.
//!
//! # Invariants
//! - Usernames are compared exactly (case-sensitive) after trimming.
//! - Registration usernames contain no whitespace and have at least
//!   `USERNAME_MIN_CHARS` characters.
//! - Registration passwords have at least `PASSWORD_MIN_CHARS` characters.
//! - Raw passwords never appear in `Debug` output.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Minimum username length accepted by registration.
pub const USERNAME_MIN_CHARS: usize = 3;
/// Minimum password length accepted by registration.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Authorization tier of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May update and delete inventory rows.
    Admin,
    /// May list and add inventory rows.
    #[default]
    User,
}

impl Role {
    /// Stable storage value for `users.role`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parses a stored `users.role` value. Matching is exact.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public read model of one stored user. The password hash is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

/// Rejected credential input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username or password is empty after trimming.
    EmptyCredentials,
    UsernameContainsWhitespace,
    UsernameTooShort { min_chars: usize },
    PasswordTooShort { min_chars: usize },
}

impl Display for CredentialValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCredentials => write!(f, "Please enter both username and password."),
            Self::UsernameContainsWhitespace => write!(f, "Username cannot contain spaces."),
            Self::UsernameTooShort { min_chars } => {
                write!(f, "Username must be at least {min_chars} characters.")
            }
            Self::PasswordTooShort { min_chars } => {
                write!(f, "Password must be at least {min_chars} characters.")
            }
        }
    }
}

impl Error for CredentialValidationError {}

/// Normalized username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Normalizes login input: both fields trimmed and required.
    pub fn for_login(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CredentialValidationError::EmptyCredentials);
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Normalizes registration input and applies the account creation rules.
    pub fn for_registration(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let credentials = Self::for_login(username, password)?;

        if credentials.username.chars().any(char::is_whitespace) {
            return Err(CredentialValidationError::UsernameContainsWhitespace);
        }
        if credentials.username.chars().count() < USERNAME_MIN_CHARS {
            return Err(CredentialValidationError::UsernameTooShort {
                min_chars: USERNAME_MIN_CHARS,
            });
        }
        if credentials.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(CredentialValidationError::PasswordTooShort {
                min_chars: PASSWORD_MIN_CHARS,
            });
        }

        Ok(credentials)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
