//! Scheduler tunables and database settings.
//!
//! [`SchedulerConfig`] is usually parsed from JSON, with every field
//! optional. [`DatabaseConfig`] comes from the process environment, after a
//! `.env` file in the working directory has been loaded if present.

use crate::scheduling::domain::CostModel;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_VAR: &str = "SHOPFLOOR_DB_POOL_SIZE";

const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A value is outside its accepted range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required environment variable is not set.
    #[error("missing environment variable `{0}`")]
    MissingVar(&'static str),
}

/// Tunables for the assignment objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Cost charged for every task left in the queue.
    pub queue_penalty: f64,
    /// Age in days at which a task's assignment weight doubles.
    pub aging_horizon_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            queue_penalty: CostModel::DEFAULT_QUEUE_PENALTY,
            aging_horizon_days: CostModel::DEFAULT_AGING_HORIZON_DAYS,
        }
    }
}

impl SchedulerConfig {
    /// Validates the tunables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-finite or non-positive
    /// penalty and for a zero aging horizon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.queue_penalty.is_finite() || self.queue_penalty <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "queue_penalty",
                reason: format!("must be a positive number, got {}", self.queue_penalty),
            });
        }
        if self.aging_horizon_days == 0 {
            return Err(ConfigError::Invalid {
                field: "aging_horizon_days",
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the errors of
    /// [`SchedulerConfig::validate`].
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the cost model built from these tunables.
    #[must_use]
    pub const fn cost_model(&self) -> CostModel {
        CostModel::new(self.queue_penalty, self.aging_horizon_days)
    }
}

/// Connection settings for the `PostgreSQL` adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    pool_size: u32,
}

impl DatabaseConfig {
    /// Creates settings from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a blank URL or a zero pool size.
    pub fn new(connection_url: impl Into<String>, pool_size: u32) -> Result<Self, ConfigError> {
        let url = connection_url.into();
        if url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "url",
                reason: "must not be empty".to_owned(),
            });
        }
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                field: "pool_size",
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(Self { url, pool_size })
    }

    /// Reads settings from the environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when `DATABASE_URL` is unset, and
    /// [`ConfigError::Invalid`] for an unparsable pool size.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(error = %err, "no .env file loaded");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Same as [`DatabaseConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(DATABASE_URL_VAR).ok_or(ConfigError::MissingVar(DATABASE_URL_VAR))?;
        let pool_size = match lookup(POOL_SIZE_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "pool_size",
                reason: format!("`{raw}` is not a positive integer"),
            })?,
            None => DEFAULT_POOL_SIZE,
        };
        Self::new(url, pool_size)
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }
}
