//! Runtime configuration.
//!
//! ```ignore
//! use stock_ledger::LedgerConfig;
//!
//! // STOCK_LEDGER_LOCK_TIMEOUT_MS=250 in the environment or a .env file
//! let config = LedgerConfig::from_env()?;
//! ```

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the row-lock wait budget in milliseconds.
pub const LOCK_TIMEOUT_ENV: &str = "STOCK_LEDGER_LOCK_TIMEOUT_MS";

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number of milliseconds, got {value:?}")]
    InvalidDuration { name: &'static str, value: String },
    #[error("failed to read {name}: {message}")]
    Env { name: &'static str, message: String },
}

/// Settings shared by the store, engine and catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// How long `get_for_update` waits for a row lock before giving up with
    /// a transient lock timeout.
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Load settings from the process environment, after reading `.env` if
    /// one is present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default();
        match dotenvy::var(LOCK_TIMEOUT_ENV) {
            Ok(raw) => Ok(config.with_lock_timeout(parse_millis(LOCK_TIMEOUT_ENV, &raw)?)),
            Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(config),
            Err(err) => Err(ConfigError::Env {
                name: LOCK_TIMEOUT_ENV,
                message: err.to_string(),
            }),
        }
    }
}

fn parse_millis(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidDuration {
            name,
            value: raw.to_string(),
        }),
    }
}
