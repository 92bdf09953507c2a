//! Runtime configuration: storage connection settings and provider pricing.

use std::collections::HashMap;
use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::adapters::postgres::PgPool;
use crate::session::domain::ModelPricing;

/// Primary environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "ASSISTANT_DATABASE_URL";
/// Fallback environment variable holding the database URL.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable overriding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "ASSISTANT_DB_MAX_CONNECTIONS";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No database URL was configured.
    #[error("no database URL configured; set {DATABASE_URL_VAR} or {FALLBACK_DATABASE_URL_VAR}")]
    MissingDatabaseUrl,

    /// A variable held a value that could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// The pricing table could not be decoded.
    #[error("invalid pricing table: {0}")]
    Pricing(#[from] serde_json::Error),

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(String),
}

/// Connection settings for the `PostgreSQL` message store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection.
    pub connection_timeout: Duration,
}

impl StoreConfig {
    /// Default pool size.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;
    /// Default connection checkout timeout.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates settings with default pool limits.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// Settings for tests: a single connection and a short timeout.
    #[must_use]
    pub fn single_connection(database_url: impl Into<String>) -> Self {
        Self {
            max_connections: 1,
            connection_timeout: Duration::from_secs(5),
            ..Self::new(database_url)
        }
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] if neither URL variable is
    /// set, or [`ConfigError::InvalidValue`] for an unparsable pool size.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .or_else(|| lookup(FALLBACK_DATABASE_URL_VAR))
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: MAX_CONNECTIONS_VAR,
                    value: raw,
                })?,
            None => Self::DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            max_connections,
            ..Self::new(database_url)
        })
    }

    /// Builds an r2d2 connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] if the pool cannot be created.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Pool::builder()
            .max_size(self.max_connections)
            .connection_timeout(self.connection_timeout)
            .build(manager)
            .map_err(|e| ConfigError::Pool(e.to_string()))
    }
}

/// Provider pricing keyed by provider id.
///
/// # Examples
///
/// ```
/// use assistant_core::config::PricingTable;
///
/// let table = PricingTable::from_json(r#"{"claude": {"input": 3.0, "output": 15.0}}"#)
///     .expect("valid pricing");
/// assert!(table.get("claude").is_some());
/// assert!(table.get("unknown").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable {
    providers: HashMap<String, ModelPricing>,
}

impl PricingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a table from a JSON object of provider id to pricing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pricing`] if the JSON does not decode.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds or replaces one provider's pricing.
    #[must_use]
    pub fn with_pricing(mut self, provider_id: impl Into<String>, pricing: ModelPricing) -> Self {
        self.providers.insert(provider_id.into(), pricing);
        self
    }

    /// Returns a provider's pricing.
    #[must_use]
    pub fn get(&self, provider_id: &str) -> Option<&ModelPricing> {
        self.providers.get(provider_id)
    }

    /// Returns the number of priced providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no provider is priced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
