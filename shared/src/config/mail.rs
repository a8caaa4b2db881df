//! Mail sender, template and link configuration

use serde::{Deserialize, Serialize};

use super::{env_parse, env_str, ConfigError};

/// SMTP sender configuration.
///
/// Transport itself lives outside this service; the sender address is the
/// only field the verification flows read directly.
#[derive(Clone, Deserialize, Serialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::from("no-reply@localhost"),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            smtp_host: env_str("MAIL_SMTP_HOST", &defaults.smtp_host),
            smtp_port: env_parse("MAIL_SMTP_PORT", defaults.smtp_port)?,
            username: env_str("MAIL_USERNAME", &defaults.username),
            password: env_str("MAIL_PASSWORD", &defaults.password),
            from_address: env_str("MAIL_FROM_ADDRESS", &defaults.from_address),
        })
    }
}

/// Template names handed to the mail collaborator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateConfig {
    pub base_path: String,
    pub mail_confirmation: String,
    pub password_reset: String,
    pub two_factor_auth: String,
    pub extension: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            base_path: String::from("templates"),
            mail_confirmation: String::from("mail_confirmation"),
            password_reset: String::from("pass_reset"),
            two_factor_auth: String::from("2fa_email"),
            extension: String::from(".html"),
        }
    }
}

impl TemplateConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_path: env_str("TEMPLATE_BASE_PATH", &defaults.base_path),
            extension: env_str("TEMPLATE_EXTENSION", &defaults.extension),
            ..defaults
        }
    }
}

/// Public links embedded in outgoing mail
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub verify_endpoint: String,
    pub reset_pass_endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            verify_endpoint: String::from("/verify"),
            reset_pass_endpoint: String::from("/reset-password"),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_str("API_BASE_URL", &defaults.base_url),
            verify_endpoint: env_str("API_VERIFY_ENDPOINT", &defaults.verify_endpoint),
            reset_pass_endpoint: env_str(
                "API_RESET_PASS_ENDPOINT",
                &defaults.reset_pass_endpoint,
            ),
        }
    }
}
