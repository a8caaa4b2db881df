//! Verification service module
//!
//! This module provides the complete verification workflow:
//! - Issuance of tokens and codes with delivery by mail or SMS
//! - Shape validation of submissions into `ValidatedRequest`
//! - The attempt state machine with attempt tracking and expiry
//! - Per-key locking and compare-and-swap against the attempt store

mod config;
mod locks;
mod service;
mod traits;
mod types;
pub mod validator;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use locks::{KeyGuard, KeyedLocks};
pub use service::VerificationService;
pub use traits::{AccessAuthority, MailDispatcher, SmsDispatcher, VerificationStore};
pub use types::{IssueOutcome, IssueRequest, SubmitOutcome};
pub use validator::{validate_request, ValidatedRequest};
