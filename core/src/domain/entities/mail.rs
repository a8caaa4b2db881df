//! Outgoing mail payloads handed to the mail collaborator.

use serde::{Deserialize, Serialize};

/// Template family of an outgoing mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailKind {
    MailConfirmation,
    PasswordReset,
    TwoFactorAuth,
}

impl MailKind {
    pub fn default_subject(&self) -> &'static str {
        match self {
            MailKind::MailConfirmation => "Email Verification",
            MailKind::PasswordReset => "Password Reset Request",
            MailKind::TwoFactorAuth => "Your Verification Code",
        }
    }
}

/// Values substituted into the mail template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailData {
    pub username: String,
    pub code: Option<String>,
    pub token: Option<String>,
    pub expires_in_minutes: i64,
    pub base_url: String,
    pub verify_endpoint: String,
    pub reset_pass_endpoint: String,
}

impl MailData {
    /// Link to the verification page carrying the token, if one was issued
    pub fn verify_link(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{}{}?token={}", self.base_url, self.verify_endpoint, token))
    }

    /// Link to the password reset page carrying the token, if one was issued
    pub fn reset_link(&self) -> Option<String> {
        self.token.as_ref().map(|token| {
            format!("{}{}?token={}", self.base_url, self.reset_pass_endpoint, token)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub kind: MailKind,
    pub data: MailData,
}
