//! External access token authority configuration

use serde::{Deserialize, Serialize};

use super::{env_opt, env_parse, ConfigError};

/// Where bearer tokens are validated.
///
/// When `url` is absent the service runs with a development authority that
/// accepts any well-formed bearer token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorityConfig {
    pub url: Option<String>,

    /// Timeout for a single authority call in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl AuthorityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_opt("AUTHORITY_URL"),
            timeout_secs: env_parse("AUTHORITY_TIMEOUT", default_timeout())?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

fn default_timeout() -> u64 {
    5
}
