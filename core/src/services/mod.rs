//! Business services containing domain logic and use cases.

pub mod generator;
pub mod verification;

// Re-export commonly used types
pub use generator::SecureGenerator;
pub use verification::{
    validate_request, AccessAuthority, IssueOutcome, IssueRequest, MailDispatcher,
    SmsDispatcher, SubmitOutcome, ValidatedRequest, VerificationService,
    VerificationServiceConfig, VerificationStore,
};
