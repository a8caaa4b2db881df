//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{DeliveryError, GenerationError, StoreError};

use bl_shared::ValidationResult;
use thiserror::Error;

/// Core domain errors
///
/// `AttemptUnavailable` covers missing, expired and undelivered attempts alike.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Validation failed")]
    ValidationFailed(ValidationResult),

    #[error("Unsupported verification type: {verification_type}")]
    UnsupportedVerificationType { verification_type: String },

    #[error("Unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("Verification attempt unavailable")]
    AttemptUnavailable,

    #[error("Invalid credential, {remaining_attempts} attempts remaining")]
    InvalidCredential { remaining_attempts: u32 },

    #[error("Maximum verification attempts exceeded")]
    Exhausted,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to collaborator error types
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationResult> for DomainError {
    fn from(result: ValidationResult) -> Self {
        DomainError::ValidationFailed(result)
    }
}

impl DomainError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        DomainError::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Server-side failure whose detail must not reach the client
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            DomainError::Generation(_)
                | DomainError::Delivery(_)
                | DomainError::Store(_)
                | DomainError::Internal { .. }
                | DomainError::DeadlineExceeded
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
