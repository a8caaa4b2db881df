//! Security configuration for verification credentials

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{env_parse, ConfigError};

/// Lengths, expiry windows and attempt limits for issued credentials.
///
/// Expiry values are deployment configuration; the defaults mirror the
/// windows the product ships with (30 min email, 15 min reset, 5 min 2FA).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Random bytes drawn for each link token
    pub token_length_bytes: usize,

    /// Number of digits in a short code
    pub short_code_length: usize,

    /// Email verification expiry in seconds
    pub email_expiration_secs: i64,

    /// Password reset expiry in seconds
    pub password_expiration_secs: i64,

    /// Two-factor code expiry in seconds
    pub two_factor_expiration_secs: i64,

    /// Failed submissions allowed before an attempt is exhausted
    pub max_attempts: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            token_length_bytes: 128,
            short_code_length: 6,
            email_expiration_secs: 1800,
            password_expiration_secs: 900,
            two_factor_expiration_secs: 300,
            max_attempts: 5,
        }
    }
}

impl SecurityConfig {
    /// Create from environment variables; set but unparsable values are rejected
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            token_length_bytes: env_parse("SECURITY_TOKEN_LENGTH", defaults.token_length_bytes)?,
            short_code_length: env_parse("SECURITY_CODE_LENGTH", defaults.short_code_length)?,
            email_expiration_secs: env_parse(
                "SECURITY_EMAIL_EXPIRATION",
                defaults.email_expiration_secs,
            )?,
            password_expiration_secs: env_parse(
                "SECURITY_PASSWORD_EXPIRATION",
                defaults.password_expiration_secs,
            )?,
            two_factor_expiration_secs: env_parse(
                "SECURITY_2FA_EXPIRATION",
                defaults.two_factor_expiration_secs,
            )?,
            max_attempts: env_parse("SECURITY_MAX_ATTEMPTS", defaults.max_attempts)?,
        })
    }

    pub fn email_expiration(&self) -> Duration {
        Duration::seconds(self.email_expiration_secs)
    }

    pub fn password_expiration(&self) -> Duration {
        Duration::seconds(self.password_expiration_secs)
    }

    pub fn two_factor_expiration(&self) -> Duration {
        Duration::seconds(self.two_factor_expiration_secs)
    }

    /// Reject values that would produce guessable or already-expired credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_length_bytes < 16 {
            return Err(invalid("SECURITY_TOKEN_LENGTH", "must be at least 16 bytes"));
        }
        if self.short_code_length < 4 {
            return Err(invalid("SECURITY_CODE_LENGTH", "must be at least 4 digits"));
        }
        for (key, secs) in [
            ("SECURITY_EMAIL_EXPIRATION", self.email_expiration_secs),
            ("SECURITY_PASSWORD_EXPIRATION", self.password_expiration_secs),
            ("SECURITY_2FA_EXPIRATION", self.two_factor_expiration_secs),
        ] {
            if secs <= 0 {
                return Err(invalid(key, "must be a positive number of seconds"));
            }
        }
        if self.max_attempts == 0 {
            return Err(invalid("SECURITY_MAX_ATTEMPTS", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SecurityConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.email_expiration(), Duration::minutes(30));
        assert_eq!(config.password_expiration(), Duration::minutes(15));
        assert_eq!(config.two_factor_expiration(), Duration::minutes(5));
    }

    #[test]
    fn test_rejects_short_token() {
        let config = SecurityConfig {
            token_length_bytes: 8,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "SECURITY_TOKEN_LENGTH"
        ));
    }

    #[test]
    fn test_rejects_non_positive_expiry() {
        let config = SecurityConfig {
            two_factor_expiration_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let config = SecurityConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
