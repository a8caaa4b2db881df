//! Shape validation of inbound verification submissions

use bl_shared::validation::{
    is_valid_email, validate_required, ValidationError, ValidationErrorKind, ValidationResult,
    EMAIL_PATTERN,
};

use crate::domain::entities::verification::{VerificationKey, VerificationRequest, VerificationType};

/// A submission that passed [`validate_request`].
///
/// The only way to obtain one is through validation, so the verification
/// service never sees an unchecked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    key: VerificationKey,
    code: Option<String>,
    token: Option<String>,
}

impl ValidatedRequest {
    pub fn verification_type(&self) -> VerificationType {
        self.key.verification_type
    }

    /// Normalized subject identifier
    pub fn identifier(&self) -> &str {
        &self.key.identifier
    }

    pub fn key(&self) -> &VerificationKey {
        &self.key
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Run every rule against `request` and collect all failures
pub fn validate(request: &VerificationRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Err(err) = validate_required(&request.identifier, "identifier") {
        result.add(err);
    }

    let parsed = request.parsed_type();
    if parsed.is_none() {
        let mut err = ValidationError::new(
            "verification_type",
            ValidationErrorKind::Required,
            "verification_type is required",
        )
        .with_metadata("provided", request.verification_type.as_str());
        if !request.verification_type.is_empty() {
            err.message = format!("Unknown verification type: {}", request.verification_type);
        }
        result.add(err);
    }

    if parsed.map_or(false, |t| t.is_email_flavored()) && !is_valid_email(request.identifier.trim()) {
        result.add(
            ValidationError::new(
                "identifier",
                ValidationErrorKind::InvalidFormat,
                "Invalid email format",
            )
            .with_metadata("pattern", EMAIL_PATTERN)
            .with_metadata("value", request.identifier.as_str()),
        );
    }

    if request.requires_code() && request.code.is_empty() {
        result.add_error("code", ValidationErrorKind::Required, "Verification code is required");
    }

    if request.requires_token() && request.token.is_empty() {
        result.add_error("token", ValidationErrorKind::Required, "Verification token is required");
    }

    result
}

/// Validate `request`, yielding the typed form on success
pub fn validate_request(request: VerificationRequest) -> Result<ValidatedRequest, ValidationResult> {
    let result = validate(&request);
    match request.parsed_type() {
        Some(verification_type) if !result.has_errors() => Ok(ValidatedRequest {
            key: VerificationKey::new(verification_type, &request.identifier),
            code: Some(request.code).filter(|c| !c.is_empty()),
            token: Some(request.token).filter(|t| !t.is_empty()),
        }),
        _ => Err(result),
    }
}
