//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_str, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Per-request deadline in seconds; store mutations are skipped once it passes
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// Comma separated origins allowed by CORS outside development
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
            workers: 0,
            request_timeout_secs: default_request_timeout(),
            max_payload_size: default_max_payload_size(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_str("SERVER_HOST", &defaults.host),
            port: env_parse("SERVER_PORT", defaults.port)?,
            workers: env_parse("SERVER_WORKERS", defaults.workers)?,
            request_timeout_secs: env_parse("SERVER_REQUEST_TIMEOUT", defaults.request_timeout_secs)?,
            max_payload_size: env_parse("SERVER_MAX_PAYLOAD_SIZE", defaults.max_payload_size)?,
            allowed_origins: env_str("ALLOWED_ORIGINS", "")
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_payload_size() -> usize {
    64 * 1024
}
