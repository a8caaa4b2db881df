use serde::{Deserialize, Serialize};
use validator::Validate;

use bl_shared::validation::{validate_email, validate_required, ValidationResult};

use super::validation_result;

/// Body of `POST /api/mail/send-verification`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SendVerificationRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    /// Greeting name used by the mail template
    pub username: String,
}

impl SendVerificationRequest {
    /// Required fields first, then the email grammar
    pub fn check(&self) -> Result<(), ValidationResult> {
        if let Err(errors) = self.validate() {
            return Err(validation_result(&errors));
        }
        validate_email(self.email.trim()).map_err(ValidationResult::from)
    }
}

/// Query of `GET /api/mail/get-password-reset-code`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordResetQuery {
    pub email: String,
}

impl PasswordResetQuery {
    pub fn check(&self) -> Result<(), ValidationResult> {
        validate_required(&self.email, "email")?;
        validate_email(self.email.trim())?;
        Ok(())
    }
}

/// Delivery channel of a two-factor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwoFactorChannel {
    #[default]
    Email,
    Phone,
}

/// Body of `POST /api/mail/send-2fa`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SendTwoFactorRequest {
    #[validate(length(min = 1, message = "identifier is required"))]
    pub identifier: String,

    pub channel: TwoFactorChannel,
}

impl SendTwoFactorRequest {
    /// Shape only; the identifier grammar is checked per channel on issuance
    pub fn check(&self) -> Result<(), ValidationResult> {
        self.validate().map_err(|errors| validation_result(&errors))
    }
}
