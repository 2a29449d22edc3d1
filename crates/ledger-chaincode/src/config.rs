//! Chaincode configuration from environment variables.

use crate::domain::TransferRule;
use crate::errors::ConfigError;
use std::env;
use tracing::warn;

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full `EnvFilter`).
    pub log_level: String,
    /// Emit JSON-formatted logs.
    pub json_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Complete chaincode configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChaincodeConfig {
    /// Which party of `move` is credited.
    pub transfer_rule: TransferRule,
    /// Cap on elements a rich query may return. `None` means unlimited.
    pub max_query_results: Option<usize>,
    /// Logging settings.
    pub log: LogConfig,
}

impl ChaincodeConfig {
    /// Read configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `LC_TRANSFER_RULE`: `credit-first` (default) or `debit-first`
    /// - `LC_MAX_QUERY_RESULTS`: positive integer (default: unlimited)
    /// - `LC_LOG_LEVEL` or `RUST_LOG`: log filter (default: info)
    /// - `LC_JSON_LOGS`: enable JSON logs (default: false)
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Self::try_from_env`], falling back to defaults on invalid input.
    #[must_use]
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid chaincode configuration, using defaults");
            Self::default()
        })
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transfer_rule = match lookup("LC_TRANSFER_RULE") {
            Some(name) => TransferRule::from_name(name.trim())
                .ok_or(ConfigError::UnknownTransferRule(name))?,
            None => TransferRule::default(),
        };

        let max_query_results = match lookup("LC_MAX_QUERY_RESULTS") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "LC_MAX_QUERY_RESULTS",
                        value,
                    })
                }
            },
            None => None,
        };

        let log = LogConfig {
            log_level: lookup("LC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            json_logs: lookup("LC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        };

        Ok(Self {
            transfer_rule,
            max_query_results,
            log,
        })
    }
}
