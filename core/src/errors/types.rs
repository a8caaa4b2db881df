//! Collaborator-level error types
//!
//! Each collaborator reports failures through its own enum; the domain error
//! bridges them with `#[from]` so services can propagate with `?`.

use thiserror::Error;

/// Failures of the secure token/code generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("requested credential length must be greater than zero")]
    InvalidLength,

    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

/// Failures of mail or SMS delivery
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("sms delivery failed: {0}")]
    Sms(String),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Failures of the verification attempt store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    #[error("stored attempt could not be decoded: {0}")]
    Corrupt(String),
}
