//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `security` - Token/code lengths, expiry windows and attempt ceilings
//! - `mail` - SMTP sender identity, templates and link endpoints
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding and request deadline
//! - `store` - Verification attempt storage backend
//! - `authority` - External access token authority

pub mod authority;
pub mod environment;
pub mod mail;
pub mod security;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use authority::AuthorityConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::{ApiConfig, MailConfig, TemplateConfig};
pub use security::SecurityConfig;
pub use server::ServerConfig;
pub use store::{StoreBackend, StoreConfig};

/// Errors raised while assembling or validating configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub templates: TemplateConfig,
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub authority: AuthorityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            mail: MailConfig::default(),
            templates: TemplateConfig::default(),
            api: ApiConfig::default(),
            store: StoreConfig::default(),
            authority: AuthorityConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let config = Self {
            environment,
            server: ServerConfig::from_env()?,
            security: SecurityConfig::from_env()?,
            mail: MailConfig::from_env()?,
            templates: TemplateConfig::from_env(),
            api: ApiConfig::from_env(),
            store: StoreConfig::from_env()?,
            authority: AuthorityConfig::from_env()?,
            logging: LoggingConfig::from_env(environment),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that the individual loaders cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.security.validate()?;
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SERVER_REQUEST_TIMEOUT".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Read a string variable, falling back to `default` when unset or empty
pub(crate) fn env_str(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Read an optional string variable, treating empty values as unset
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Read and parse a variable, falling back to `default` only when unset or empty.
///
/// A value that is present but does not parse is an error rather than a silent default.
pub(crate) fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env_opt(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{:?} is not valid: {}", raw, err),
        }),
    }
}
