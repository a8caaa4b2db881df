//! Configuration for the verification service

use chrono::Duration;

use bl_shared::config::{ApiConfig, SecurityConfig};

use crate::domain::entities::verification::{VerificationPolicy, VerificationType};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Random bytes behind each token
    pub token_length_bytes: usize,
    /// Digits in each numeric code
    pub code_length: usize,
    pub email_expiry: Duration,
    pub two_factor_expiry: Duration,
    pub password_reset_expiry: Duration,
    /// Failed submissions after which an attempt is exhausted
    pub max_attempts: u32,
    /// Sender address of outgoing mail
    pub from_address: String,
    /// Links embedded into mail templates
    pub links: ApiConfig,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from_settings(&SecurityConfig::default(), ApiConfig::default(), "no-reply@localhost")
    }
}

impl VerificationServiceConfig {
    pub fn from_settings(
        security: &SecurityConfig,
        links: ApiConfig,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            token_length_bytes: security.token_length_bytes,
            code_length: security.short_code_length,
            email_expiry: security.email_expiration(),
            two_factor_expiry: security.two_factor_expiration(),
            password_reset_expiry: security.password_expiration(),
            max_attempts: security.max_attempts,
            from_address: from_address.into(),
            links,
        }
    }

    pub fn expiry_for(&self, verification_type: VerificationType) -> Duration {
        match verification_type {
            VerificationType::EmailVerification => self.email_expiry,
            VerificationType::TwoFactorEmail | VerificationType::TwoFactorPhone => {
                self.two_factor_expiry
            }
            VerificationType::PasswordReset => self.password_reset_expiry,
        }
    }

    pub fn policy(&self, verification_type: VerificationType) -> VerificationPolicy {
        VerificationPolicy::new(verification_type.rules(), self.expiry_for(verification_type))
    }
}
