use serde::{Deserialize, Serialize};
use validator::Validate;

use bl_shared::validation::{validate_email, ValidationResult};

use super::validation_result;

/// Body of `PUT /api/user/reset-password`
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("email", &self.email)
            .field("code", &"***")
            .field("new_password", &"***")
            .finish()
    }
}

impl ResetPasswordRequest {
    pub fn check(&self) -> Result<(), ValidationResult> {
        let mut result = match self.validate() {
            Ok(()) => ValidationResult::new(),
            Err(errors) => validation_result(&errors),
        };
        if !self.email.is_empty() {
            if let Err(error) = validate_email(self.email.trim()) {
                result.add(error);
            }
        }
        result.into_result()
    }
}
