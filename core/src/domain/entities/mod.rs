//! Domain entities representing core business objects.

pub mod access;
pub mod mail;
pub mod verification;

// Re-export commonly used types
pub use access::AccessGrant;
pub use mail::{Mail, MailData, MailKind};
pub use verification::{
    AttemptStatus, DeliveryChannel, ProofRule, UnknownVerificationType, VerificationData,
    VerificationKey, VerificationPolicy, VerificationRequest, VerificationRules,
    VerificationType,
};
