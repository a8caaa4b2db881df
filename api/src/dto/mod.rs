//! Request bodies and query strings of the HTTP surface
//!
//! Verification submissions decode into `bl_core::domain::entities::VerificationRequest`
//! directly; everything else lives here.

pub mod mail;
pub mod user;

pub use mail::{PasswordResetQuery, SendTwoFactorRequest, SendVerificationRequest, TwoFactorChannel};
pub use user::ResetPasswordRequest;

use bl_shared::validation::{ValidationErrorKind, ValidationResult};

/// Flatten `validator` derive errors into a [`ValidationResult`]
///
/// Fields are reported in name order so responses are stable.
pub(crate) fn validation_result(errors: &validator::ValidationErrors) -> ValidationResult {
    let mut fields: Vec<_> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (field.to_string(), errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut result = ValidationResult::new();
    for (field, errors) in fields {
        for error in errors {
            let kind = match error.code.as_ref() {
                "length" | "required" => ValidationErrorKind::Required,
                "email" => ValidationErrorKind::InvalidFormat,
                _ => ValidationErrorKind::Custom,
            };
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            result.add_error(field.clone(), kind, message);
        }
    }
    result
}
