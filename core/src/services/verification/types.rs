//! Inputs and results of the verification service

use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::entities::verification::{VerificationData, VerificationType};

/// Request to issue a fresh attempt
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub verification_type: VerificationType,
    pub identifier: String,
    /// Greeting name for mail templates
    pub username: String,
    pub deadline: Option<Instant>,
}

impl IssueRequest {
    pub fn new(verification_type: VerificationType, identifier: impl Into<String>) -> Self {
        Self {
            verification_type,
            identifier: identifier.into(),
            username: String::new(),
            deadline: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Result of issuing an attempt
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    pub attempt_id: Uuid,
    pub verification_type: VerificationType,
    pub expires_in_sec: i64,
    /// Stored record including secrets; for in-process callers only, never log it
    pub attempt: VerificationData,
}

/// Result of a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt moved to `Verified` with this submission
    Verified,
    /// The attempt was already verified; nothing changed
    AlreadyVerified,
}
