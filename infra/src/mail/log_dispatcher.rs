//! Logging mail dispatcher for development and tests

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use bl_core::domain::entities::{Mail, MailKind};
use bl_core::errors::DeliveryError;
use bl_core::services::verification::MailDispatcher;
use bl_shared::config::TemplateConfig;
use bl_shared::masking::mask_email;
use bl_shared::validation::is_valid_email;

/// Records outgoing mail in the log instead of sending it.
///
/// Only the recipient (masked), kind, subject and template are logged; codes,
/// tokens and links never are.
#[derive(Clone)]
pub struct LogMailDispatcher {
    templates: TemplateConfig,
    sent: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl LogMailDispatcher {
    pub fn new(templates: TemplateConfig) -> Self {
        Self {
            templates,
            sent: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Fail every send, for exercising delivery failure paths
    pub fn failing(templates: TemplateConfig) -> Self {
        Self {
            simulate_failure: true,
            ..Self::new(templates)
        }
    }

    /// Total number of mails dispatched
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    /// Template file a mail of `kind` is rendered from
    pub fn template_path(&self, kind: MailKind) -> PathBuf {
        let name = match kind {
            MailKind::MailConfirmation => &self.templates.mail_confirmation,
            MailKind::PasswordReset => &self.templates.password_reset,
            MailKind::TwoFactorAuth => &self.templates.two_factor_auth,
        };
        PathBuf::from(&self.templates.base_path).join(format!("{}{}", name, self.templates.extension))
    }
}

#[async_trait]
impl MailDispatcher for LogMailDispatcher {
    async fn send(&self, mail: Mail) -> Result<(), DeliveryError> {
        if mail.to.is_empty() {
            return Err(DeliveryError::InvalidRecipient("no recipients".to_string()));
        }
        if let Some(bad) = mail.to.iter().find(|to| !is_valid_email(to)) {
            return Err(DeliveryError::InvalidRecipient(mask_email(bad)));
        }

        let recipients: Vec<String> = mail.to.iter().map(|to| mask_email(to)).collect();

        if self.simulate_failure {
            warn!(
                target: "mail_service",
                to = ?recipients,
                kind = ?mail.kind,
                "Simulated mail delivery failure"
            );
            return Err(DeliveryError::Mail("simulated delivery failure".to_string()));
        }

        let count = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        let template = self.template_path(mail.kind);

        info!(
            target: "mail_service",
            provider = "log",
            from = %mail.from,
            to = ?recipients,
            kind = ?mail.kind,
            subject = %mail.subject,
            template = %template.display(),
            expires_in_minutes = mail.data.expires_in_minutes,
            count,
            "Mail dispatched"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::domain::entities::MailData;

    fn mail(to: &[&str], kind: MailKind) -> Mail {
        Mail {
            from: "noreply@example.com".to_string(),
            to: to.iter().map(|s| s.to_string()).collect(),
            subject: kind.default_subject().to_string(),
            kind,
            data: MailData {
                username: "jane".to_string(),
                code: Some("123456".to_string()),
                token: None,
                expires_in_minutes: 5,
                base_url: String::new(),
                verify_endpoint: "/verify".to_string(),
                reset_pass_endpoint: "/reset-password".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_send_counts_dispatches() {
        let dispatcher = LogMailDispatcher::new(TemplateConfig::default());
        dispatcher
            .send(mail(&["jane@example.com"], MailKind::TwoFactorAuth))
            .await
            .unwrap();
        assert_eq!(dispatcher.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let dispatcher = LogMailDispatcher::new(TemplateConfig::default());
        let result = dispatcher
            .send(mail(&["jane@example.com", "nope"], MailKind::MailConfirmation))
            .await;
        assert!(matches!(result, Err(DeliveryError::InvalidRecipient(_))));

        let result = dispatcher.send(mail(&[], MailKind::MailConfirmation)).await;
        assert!(matches!(result, Err(DeliveryError::InvalidRecipient(_))));
        assert_eq!(dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let dispatcher = LogMailDispatcher::failing(TemplateConfig::default());
        let result = dispatcher
            .send(mail(&["jane@example.com"], MailKind::PasswordReset))
            .await;
        assert!(matches!(result, Err(DeliveryError::Mail(_))));
    }

    #[test]
    fn test_template_path_per_kind() {
        let dispatcher = LogMailDispatcher::new(TemplateConfig::default());
        assert_eq!(
            dispatcher.template_path(MailKind::PasswordReset),
            PathBuf::from("templates/pass_reset.html")
        );
        assert_eq!(
            dispatcher.template_path(MailKind::TwoFactorAuth),
            PathBuf::from("templates/2fa_email.html")
        );
    }
}
