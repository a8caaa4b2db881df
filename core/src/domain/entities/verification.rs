//! Verification attempt entity and the per-type policy table.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use bl_shared::phone::normalize_phone_number;

use super::mail::MailKind;

/// Kind of identity confirmation an attempt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationType {
    #[serde(rename = "email_verification")]
    EmailVerification,
    #[serde(rename = "2fa_email")]
    TwoFactorEmail,
    #[serde(rename = "2fa_phone")]
    TwoFactorPhone,
    #[serde(rename = "password_reset")]
    PasswordReset,
}

impl VerificationType {
    pub const ALL: [VerificationType; 4] = [
        VerificationType::EmailVerification,
        VerificationType::TwoFactorEmail,
        VerificationType::TwoFactorPhone,
        VerificationType::PasswordReset,
    ];

    /// Wire name used in requests and storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::EmailVerification => "email_verification",
            VerificationType::TwoFactorEmail => "2fa_email",
            VerificationType::TwoFactorPhone => "2fa_phone",
            VerificationType::PasswordReset => "password_reset",
        }
    }

    /// Identifier of this type must be an email address
    pub fn is_email_flavored(&self) -> bool {
        self.as_str().to_lowercase().contains("email")
    }

    /// Static properties of the type: which secrets are issued, which prove
    /// the attempt and how the credential reaches its subject
    pub fn rules(&self) -> VerificationRules {
        match self {
            VerificationType::EmailVerification => VerificationRules {
                proof: ProofRule::TokenOrCode,
                issues_token: true,
                issues_code: true,
                channel: DeliveryChannel::Email,
                mail_kind: MailKind::MailConfirmation,
            },
            VerificationType::TwoFactorEmail => VerificationRules {
                proof: ProofRule::CodeOnly,
                issues_token: false,
                issues_code: true,
                channel: DeliveryChannel::Email,
                mail_kind: MailKind::TwoFactorAuth,
            },
            VerificationType::TwoFactorPhone => VerificationRules {
                proof: ProofRule::CodeOnly,
                issues_token: false,
                issues_code: true,
                channel: DeliveryChannel::Sms,
                mail_kind: MailKind::TwoFactorAuth,
            },
            VerificationType::PasswordReset => VerificationRules {
                proof: ProofRule::TokenAndCode,
                issues_token: true,
                issues_code: true,
                channel: DeliveryChannel::Email,
                mail_kind: MailKind::PasswordReset,
            },
        }
    }

    /// Normalize a raw identifier the way attempts of this type are keyed
    pub fn normalize_identifier(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            VerificationType::TwoFactorPhone => normalize_phone_number(trimmed),
            _ if self.is_email_flavored() || *self == VerificationType::PasswordReset => {
                trimmed.to_lowercase()
            }
            _ => trimmed.to_string(),
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerificationType(pub String);

impl fmt::Display for UnknownVerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown verification type '{}'", self.0)
    }
}

impl std::error::Error for UnknownVerificationType {}

impl FromStr for VerificationType {
    type Err = UnknownVerificationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVerificationType(s.to_string()))
    }
}

/// Which submitted secrets prove an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofRule {
    TokenOrCode,
    CodeOnly,
    TokenAndCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Email,
    Sms,
}

/// Type-level rules, independent of configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationRules {
    pub proof: ProofRule,
    pub issues_token: bool,
    pub issues_code: bool,
    pub channel: DeliveryChannel,
    pub mail_kind: MailKind,
}

/// Rules plus the configured expiry window for one verification type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    pub proof: ProofRule,
    pub issues_token: bool,
    pub issues_code: bool,
    pub expiry: Duration,
    pub channel: DeliveryChannel,
    pub mail_kind: MailKind,
}

impl VerificationPolicy {
    pub fn new(rules: VerificationRules, expiry: Duration) -> Self {
        Self {
            proof: rules.proof,
            issues_token: rules.issues_token,
            issues_code: rules.issues_code,
            expiry,
            channel: rules.channel,
            mail_kind: rules.mail_kind,
        }
    }
}

/// Lifecycle of an attempt: `Issued -> Pending -> {Verified, Expired, Exhausted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Stored, delivery not yet confirmed
    Issued,
    /// Delivered and awaiting submission
    Pending,
    Verified,
    Expired,
    /// Too many failed submissions
    Exhausted,
}

impl AttemptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptStatus::Verified | AttemptStatus::Expired | AttemptStatus::Exhausted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Issued => "issued",
            AttemptStatus::Pending => "pending",
            AttemptStatus::Verified => "verified",
            AttemptStatus::Expired => "expired",
            AttemptStatus::Exhausted => "exhausted",
        }
    }
}

/// Lookup key of an attempt; at most one attempt exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationKey {
    pub identifier: String,
    pub verification_type: VerificationType,
}

impl VerificationKey {
    /// Build a key, normalizing the identifier for the given type
    pub fn new(verification_type: VerificationType, identifier: &str) -> Self {
        Self {
            identifier: verification_type.normalize_identifier(identifier),
            verification_type,
        }
    }
}

impl fmt::Display for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verification_type, self.identifier)
    }
}

/// One outstanding verification attempt
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationData {
    pub id: Uuid,
    pub token: Option<String>,
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verification_type: VerificationType,
    pub subject_identifier: String,
    /// Failed submissions so far
    pub attempts: u32,
    pub status: AttemptStatus,
}

impl VerificationData {
    /// Create a freshly issued attempt
    pub fn issue(
        key: VerificationKey,
        token: Option<String>,
        code: Option<String>,
        now: DateTime<Utc>,
        expiry: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            code,
            created_at: now,
            expires_at: now + expiry,
            verification_type: key.verification_type,
            subject_identifier: key.identifier,
            attempts: 0,
            status: AttemptStatus::Issued,
        }
    }

    pub fn key(&self) -> VerificationKey {
        VerificationKey {
            identifier: self.subject_identifier.clone(),
            verification_type: self.verification_type,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == AttemptStatus::Verified
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whole seconds until expiry, floored at zero
    pub fn expires_in_sec(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// Same stored revision: identity, status and failure count all unchanged
    pub fn same_revision(&self, other: &VerificationData) -> bool {
        self.id == other.id && self.status == other.status && self.attempts == other.attempts
    }

    pub fn with_status(&self, status: AttemptStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

impl fmt::Debug for VerificationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationData")
            .field("id", &self.id)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("code", &self.code.as_ref().map(|_| "***"))
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("verification_type", &self.verification_type)
            .field("attempts", &self.attempts)
            .field("status", &self.status)
            .finish()
    }
}

/// Inbound verification submission exactly as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub verification_type: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub token: String,
}

impl VerificationRequest {
    pub fn parsed_type(&self) -> Option<VerificationType> {
        self.verification_type.parse().ok()
    }

    pub fn requires_token(&self) -> bool {
        match self.parsed_type() {
            Some(VerificationType::EmailVerification) => self.code.is_empty(),
            Some(VerificationType::PasswordReset) => true,
            Some(VerificationType::TwoFactorEmail | VerificationType::TwoFactorPhone) | None => {
                false
            }
        }
    }

    pub fn requires_code(&self) -> bool {
        match self.parsed_type() {
            Some(VerificationType::EmailVerification) => self.token.is_empty(),
            Some(
                VerificationType::TwoFactorEmail
                | VerificationType::TwoFactorPhone
                | VerificationType::PasswordReset,
            ) => true,
            None => false,
        }
    }
}
