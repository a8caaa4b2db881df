//! # Verification Core
//!
//! Domain layer of the verification service: entities, the secure credential
//! generator, request validation, the verification attempt state machine and
//! the collaborator traits that infrastructure implements.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessGrant, AttemptStatus, Mail, VerificationData, VerificationKey, VerificationRequest,
    VerificationType,
};
pub use errors::{DomainError, DomainResult};
pub use services::{SecureGenerator, VerificationService, VerificationServiceConfig};
