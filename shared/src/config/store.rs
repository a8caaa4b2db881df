//! Verification attempt storage configuration

use serde::{Deserialize, Serialize};

use super::{env_str, ConfigError};

/// Storage backend for outstanding verification attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; attempts vanish on restart
    Memory,
    /// Shared Redis instance; required when running more than one replica
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(ConfigError::InvalidValue {
                key: "VERIFICATION_STORE".to_string(),
                reason: format!("unknown backend '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Redis connection URL, used when `backend` is `Redis`
    pub redis_url: String,

    /// Key namespace for attempts kept in Redis
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: String::from("redis://localhost:6379"),
            key_prefix: String::from("verification"),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            backend: env_str("VERIFICATION_STORE", "memory").parse()?,
            redis_url: env_str("REDIS_URL", &defaults.redis_url),
            key_prefix: env_str("VERIFICATION_KEY_PREFIX", &defaults.key_prefix),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
