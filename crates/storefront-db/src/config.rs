//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default           |
//! |---------------------------------|-------------------|
//! | `STOREFRONT_DB_PATH`            | `./storefront.db` |
//! | `STOREFRONT_DB_MAX_CONNECTIONS` | `5`               |
//! | `STOREFRONT_DB_BUSY_TIMEOUT_MS` | `5000`            |
//! | `STOREFRONT_QUERY_TIMEOUT_MS`   | `5000`            |
//! | `STOREFRONT_SEED_ON_STARTUP`    | `true`            |
//!
//! Log filtering is read separately from `RUST_LOG` by the subscriber.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::pool::DbConfig;

pub const DB_PATH: &str = "STOREFRONT_DB_PATH";
pub const DB_MAX_CONNECTIONS: &str = "STOREFRONT_DB_MAX_CONNECTIONS";
pub const DB_BUSY_TIMEOUT_MS: &str = "STOREFRONT_DB_BUSY_TIMEOUT_MS";
pub const QUERY_TIMEOUT_MS: &str = "STOREFRONT_QUERY_TIMEOUT_MS";
pub const SEED_ON_STARTUP: &str = "STOREFRONT_SEED_ON_STARTUP";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// SQLite lock wait in milliseconds
    pub busy_timeout_ms: u64,

    /// Per-call storage timeout in milliseconds
    pub query_timeout_ms: u64,

    /// Load the reference fixture when the database is opened
    pub seed_on_startup: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("./storefront.db"),
            max_connections: 5,
            busy_timeout_ms: 5000,
            query_timeout_ms: 5000,
            seed_on_startup: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables take their defaults; set but unparsable ones are an
    /// error naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            db_path: lookup(DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            max_connections: parse_or(&lookup, DB_MAX_CONNECTIONS, defaults.max_connections)?,

            busy_timeout_ms: parse_or(&lookup, DB_BUSY_TIMEOUT_MS, defaults.busy_timeout_ms)?,

            query_timeout_ms: parse_or(&lookup, QUERY_TIMEOUT_MS, defaults.query_timeout_ms)?,

            seed_on_startup: parse_or(&lookup, SEED_ON_STARTUP, defaults.seed_on_startup)?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(DB_MAX_CONNECTIONS.to_string()));
        }
        if config.query_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(QUERY_TIMEOUT_MS.to_string()));
        }

        Ok(config)
    }

    /// Builds the pool configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .query_timeout(Duration::from_millis(self.query_timeout_ms))
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
