//! Field validation results and common field validators

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::GenericResponse;

/// Pattern every email identifier must match after lowercasing
pub const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).unwrap());

/// Category of a field validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    Required,
    InvalidFormat,
    Custom,
}

/// Validation error with field-level details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Same error reported against a different field
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

/// Ordered collection of validation errors.
///
/// Every rule runs; nothing short-circuits, so callers see all problems at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_error(
        &mut self,
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) {
        self.add(ValidationError::new(field, kind, message));
    }

    pub fn add_error_with_metadata(
        &mut self,
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
        metadata: BTreeMap<String, Value>,
    ) {
        let mut error = ValidationError::new(field, kind, message);
        error.metadata = metadata;
        self.add(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors grouped by field, in field name order, keeping insertion order per field
    pub fn errors_map(&self) -> BTreeMap<&str, Vec<&ValidationError>> {
        let mut map: BTreeMap<&str, Vec<&ValidationError>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field.as_str()).or_default().push(error);
        }
        map
    }

    pub fn errors_by_kind(&self, kind: ValidationErrorKind) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }

    /// Render as the wire body used for 400 responses
    pub fn to_response(&self) -> GenericResponse {
        match self.first_error() {
            None => GenericResponse::ok("Validation successful"),
            Some(first) => GenericResponse::failure("Validation failed", first.message.clone())
                .with_detail("errors", &self.errors)
                .with_detail("errorsMap", self.errors_map()),
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Check an email address against [`EMAIL_PATTERN`] (case-insensitive)
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(&email.to_lowercase())
}

/// Validate an email address, reporting the failure against the `email` field
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        return Ok(());
    }
    Err(
        ValidationError::new("email", ValidationErrorKind::InvalidFormat, "Invalid email format")
            .with_metadata("pattern", EMAIL_PATTERN)
            .with_metadata("value", email),
    )
}

/// Validate that a value is present and not blank
pub fn validate_required(value: &str, field: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() {
        return Ok(());
    }
    Err(
        ValidationError::new(field, ValidationErrorKind::Required, format!("{} is required", field))
            .with_metadata("provided", value),
    )
}
