//! Runtime configuration for the stockroom core.
//!
//! # Responsibility
//! - Hold the database location, the bootstrap admin secret and password
//!   hashing cost parameters.
//! - Resolve those values from `STOCKROOM_*` environment variables.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Hashing parameters are validated when the config is built, not on first use.

use argon2::Params;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STOCKROOM_DB_PATH";
pub const ENV_ADMIN_PASSWORD: &str = "STOCKROOM_ADMIN_PASSWORD";
pub const ENV_ARGON2_MEMORY_KIB: &str = "STOCKROOM_ARGON2_MEMORY_KIB";
pub const ENV_ARGON2_ITERATIONS: &str = "STOCKROOM_ARGON2_ITERATIONS";
pub const ENV_ARGON2_PARALLELISM: &str = "STOCKROOM_ARGON2_PARALLELISM";

const DEFAULT_DB_FILE_NAME: &str = "stockroom.sqlite3";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment value is not a valid unsigned integer.
    InvalidNumber { key: &'static str, value: String },
    /// Argon2 rejected the cost parameter combination.
    InvalidHashing(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be an unsigned integer, got `{value}`")
            }
            Self::InvalidHashing(message) => write!(f, "invalid argon2 parameters: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl HashingConfig {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ConfigError> {
        let config = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        config.to_params()?;
        Ok(config)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub(crate) fn to_params(self) -> Result<Params, ConfigError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| ConfigError::InvalidHashing(err.to_string()))
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Store-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    /// Password for the seeded `admin` account. `None` keeps the built-in default.
    pub bootstrap_admin_password: Option<String>,
    pub hashing: HashingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            bootstrap_admin_password: None,
            hashing: HashingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Builds configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value_of = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value_of(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        config.bootstrap_admin_password = value_of(ENV_ADMIN_PASSWORD);

        let defaults = HashingConfig::default();
        let memory_kib = parse_u32(ENV_ARGON2_MEMORY_KIB, value_of(ENV_ARGON2_MEMORY_KIB))?
            .unwrap_or(defaults.memory_kib);
        let iterations = parse_u32(ENV_ARGON2_ITERATIONS, value_of(ENV_ARGON2_ITERATIONS))?
            .unwrap_or(defaults.iterations);
        let parallelism = parse_u32(ENV_ARGON2_PARALLELISM, value_of(ENV_ARGON2_PARALLELISM))?
            .unwrap_or(defaults.parallelism);
        config.hashing = HashingConfig::new(memory_kib, iterations, parallelism)?;

        Ok(config)
    }
}

fn parse_u32(key: &'static str, value: Option<String>) -> Result<Option<u32>, ConfigError> {
    value
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, HashingConfig, StoreConfig, ENV_ADMIN_PASSWORD, ENV_ARGON2_ITERATIONS,
        ENV_ARGON2_MEMORY_KIB, ENV_DB_PATH,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(config.bootstrap_admin_password.is_none());
    }

    #[test]
    fn environment_overrides_are_applied_and_blanks_ignored() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /data/stock.sqlite3 "),
            (ENV_ADMIN_PASSWORD, "   "),
            (ENV_ARGON2_MEMORY_KIB, "64"),
            (ENV_ARGON2_ITERATIONS, "1"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/stock.sqlite3"));
        assert!(config.bootstrap_admin_password.is_none());
        assert_eq!(config.hashing.memory_kib(), 64);
        assert_eq!(config.hashing.iterations(), 1);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_ARGON2_ITERATIONS, "many")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: ENV_ARGON2_ITERATIONS,
                value: "many".to_string(),
            }
        );
    }

    #[test]
    fn hashing_rejects_zero_iterations() {
        assert!(matches!(
            HashingConfig::new(64, 0, 1),
            Err(ConfigError::InvalidHashing(_))
        ));
    }
}
