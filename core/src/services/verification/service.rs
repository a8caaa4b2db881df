//! Main verification service implementation

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tokio::time::Instant;

use bl_shared::masking::mask_identifier;
use bl_shared::validation::{is_valid_email, ValidationError, ValidationErrorKind};

use crate::domain::entities::mail::{Mail, MailData};
use crate::domain::entities::verification::{
    AttemptStatus, DeliveryChannel, ProofRule, VerificationData, VerificationKey,
    VerificationPolicy, VerificationType,
};
use crate::errors::{DeliveryError, DomainError, DomainResult};
use crate::services::generator::SecureGenerator;

use super::config::VerificationServiceConfig;
use super::locks::KeyedLocks;
use super::traits::{MailDispatcher, SmsDispatcher, VerificationStore};
use super::types::{IssueOutcome, IssueRequest, SubmitOutcome};
use super::validator::ValidatedRequest;

/// Upper bound on re-reads after losing a compare-and-swap race
const MAX_CAS_RETRIES: usize = 16;

/// Issues verification attempts and evaluates submissions against them.
///
/// All work on one `(identifier, type)` key runs under a per-key lock, and
/// every state change goes through the store's compare-and-swap so that
/// several service instances sharing a store converge on one transition.
pub struct VerificationService<S, M, P, R = OsRng>
where
    S: VerificationStore + ?Sized,
    M: MailDispatcher + ?Sized,
    P: SmsDispatcher + ?Sized,
{
    store: Arc<S>,
    mail: Arc<M>,
    sms: Arc<P>,
    generator: SecureGenerator<R>,
    locks: KeyedLocks<VerificationKey>,
    config: VerificationServiceConfig,
}

impl<S, M, P> VerificationService<S, M, P>
where
    S: VerificationStore + ?Sized,
    M: MailDispatcher + ?Sized,
    P: SmsDispatcher + ?Sized,
{
    /// Create a new verification service backed by the OS random source
    ///
    /// # Arguments
    ///
    /// * `store` - Attempt storage
    /// * `mail` - Mail delivery for email-flavored types and password reset
    /// * `sms` - SMS delivery for phone two-factor codes
    /// * `config` - Service configuration
    pub fn new(
        store: Arc<S>,
        mail: Arc<M>,
        sms: Arc<P>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self::with_generator(store, mail, sms, config, SecureGenerator::new())
    }
}

impl<S, M, P, R> VerificationService<S, M, P, R>
where
    S: VerificationStore + ?Sized,
    M: MailDispatcher + ?Sized,
    P: SmsDispatcher + ?Sized,
    R: RngCore + CryptoRng + Clone,
{
    pub fn with_generator(
        store: Arc<S>,
        mail: Arc<M>,
        sms: Arc<P>,
        config: VerificationServiceConfig,
        generator: SecureGenerator<R>,
    ) -> Self {
        Self {
            store,
            mail,
            sms,
            generator,
            locks: KeyedLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a fresh attempt and deliver its credentials
    ///
    /// This method:
    /// 1. Validates the identifier for the delivery channel
    /// 2. Generates token and/or code per the type's policy
    /// 3. Stores the attempt, replacing any previous one for the key
    /// 4. Delivers by mail or SMS
    /// 5. Marks the attempt `Pending`
    ///
    /// A failed delivery removes the stored attempt and surfaces `Delivery`.
    pub async fn issue(&self, request: IssueRequest) -> DomainResult<IssueOutcome> {
        let policy = self.config.policy(request.verification_type);
        let key = VerificationKey::new(request.verification_type, &request.identifier);
        self.check_identifier(&key)?;

        let token = if policy.issues_token {
            Some(self.generator.generate_token(self.config.token_length_bytes)?)
        } else {
            None
        };
        let code = if policy.issues_code {
            Some(self.generator.generate_numeric_code(self.config.code_length)?)
        } else {
            None
        };
        let attempt = VerificationData::issue(key.clone(), token, code, Utc::now(), policy.expiry);
        let masked = mask_identifier(&key.identifier);

        let _guard = self.locks.lock(&key).await;

        check_deadline(request.deadline)?;
        self.store.put(attempt.clone()).await?;

        tracing::info!(
            identifier = %masked,
            verification_type = %key.verification_type,
            attempt_id = %attempt.id,
            event = "verification_issued",
            "Stored new verification attempt"
        );

        if let Err(e) = self.deliver(&attempt, &policy, &request.username).await {
            tracing::error!(
                identifier = %masked,
                attempt_id = %attempt.id,
                error = %e,
                event = "verification_delivery_failed",
                "Failed to deliver verification credentials"
            );
            if let Err(remove_err) = self.store.remove(&key).await {
                tracing::error!(
                    attempt_id = %attempt.id,
                    error = %remove_err,
                    event = "verification_cleanup_failed",
                    "Failed to remove undelivered verification attempt"
                );
            }
            return Err(e.into());
        }

        check_deadline(request.deadline)?;
        let pending = attempt.with_status(AttemptStatus::Pending);
        if !self.store.compare_and_swap(&attempt, pending.clone()).await? {
            tracing::warn!(
                identifier = %masked,
                attempt_id = %attempt.id,
                event = "verification_superseded",
                "Attempt was replaced by a concurrent issuance before delivery completed"
            );
        }

        Ok(IssueOutcome {
            attempt_id: pending.id,
            verification_type: pending.verification_type,
            expires_in_sec: policy.expiry.num_seconds(),
            attempt: pending,
        })
    }

    /// Evaluate a submission against the stored attempt for its key
    ///
    /// # Returns
    ///
    /// * `Ok(SubmitOutcome::Verified)` - The attempt was verified by this submission
    /// * `Ok(SubmitOutcome::AlreadyVerified)` - Correct secret for an already verified attempt
    /// * `Err(AttemptUnavailable)` - Missing, undelivered or expired attempt
    /// * `Err(InvalidCredential)` - Wrong secret, attempts remain
    /// * `Err(Exhausted)` - Too many failed submissions
    pub async fn submit(
        &self,
        request: &ValidatedRequest,
        deadline: Option<Instant>,
    ) -> DomainResult<SubmitOutcome> {
        let key = request.key();
        let masked = mask_identifier(&key.identifier);
        let _guard = self.locks.lock(key).await;

        for _ in 0..MAX_CAS_RETRIES {
            let current = match self.store.get(key).await? {
                Some(current) => current,
                None => {
                    tracing::warn!(
                        identifier = %masked,
                        verification_type = %key.verification_type,
                        event = "verification_not_found",
                        "No verification attempt for submission"
                    );
                    return Err(DomainError::AttemptUnavailable);
                }
            };

            match current.status {
                AttemptStatus::Issued | AttemptStatus::Expired => {
                    return Err(DomainError::AttemptUnavailable)
                }
                AttemptStatus::Exhausted => return Err(DomainError::Exhausted),
                AttemptStatus::Verified => {
                    return if proof_matches(&current, request) {
                        Ok(SubmitOutcome::AlreadyVerified)
                    } else {
                        Err(DomainError::InvalidCredential {
                            remaining_attempts: self.remaining_attempts(&current),
                        })
                    };
                }
                AttemptStatus::Pending => {}
            }

            if current.is_expired_at(Utc::now()) {
                check_deadline(deadline)?;
                let expired = current.with_status(AttemptStatus::Expired);
                if self.store.compare_and_swap(&current, expired).await? {
                    tracing::info!(
                        identifier = %masked,
                        attempt_id = %current.id,
                        event = "verification_expired",
                        "Verification attempt expired before submission"
                    );
                    return Err(DomainError::AttemptUnavailable);
                }
                continue;
            }

            let matched = proof_matches(&current, request);
            check_deadline(deadline)?;

            if matched {
                let verified = current.with_status(AttemptStatus::Verified);
                if self.store.compare_and_swap(&current, verified).await? {
                    tracing::info!(
                        identifier = %masked,
                        attempt_id = %current.id,
                        event = "verification_succeeded",
                        "Verification attempt verified"
                    );
                    return Ok(SubmitOutcome::Verified);
                }
                continue;
            }

            match self.record_failure(&current, &masked).await? {
                Some(rejection) => return Err(rejection),
                None => continue,
            }
        }

        tracing::error!(
            identifier = %masked,
            event = "verification_contention",
            "Gave up after repeated concurrent modifications"
        );
        Err(DomainError::internal("verification attempt kept changing concurrently"))
    }

    /// Consume a verified password reset attempt.
    ///
    /// `apply` runs while the attempt is locked and only after the code has
    /// been checked; the attempt is removed once `apply` succeeds, so each
    /// verified reset can change the password exactly once. Wrong codes count
    /// against the same attempt budget as submissions, and a reset past its
    /// expiry can no longer be redeemed.
    pub async fn redeem_password_reset<F, Fut>(
        &self,
        email: &str,
        code: &str,
        deadline: Option<Instant>,
        apply: F,
    ) -> DomainResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DomainResult<()>>,
    {
        let key = VerificationKey::new(VerificationType::PasswordReset, email);
        let masked = mask_identifier(&key.identifier);
        let _guard = self.locks.lock(&key).await;

        for _ in 0..MAX_CAS_RETRIES {
            let current = self
                .store
                .get(&key)
                .await?
                .ok_or(DomainError::AttemptUnavailable)?;

            match current.status {
                AttemptStatus::Verified => {}
                AttemptStatus::Exhausted => return Err(DomainError::Exhausted),
                _ => return Err(DomainError::AttemptUnavailable),
            }

            if current.is_expired_at(Utc::now()) {
                tracing::warn!(
                    identifier = %masked,
                    attempt_id = %current.id,
                    event = "password_reset_expired",
                    "Password reset redemption after expiry"
                );
                return Err(DomainError::AttemptUnavailable);
            }

            check_deadline(deadline)?;

            if !secret_matches(current.code.as_deref(), Some(code)) {
                match self.record_failure(&current, &masked).await? {
                    Some(rejection) => return Err(rejection),
                    None => continue,
                }
            }

            apply().await?;
            self.store.remove(&key).await?;

            tracing::info!(
                identifier = %masked,
                attempt_id = %current.id,
                event = "password_reset_redeemed",
                "Password reset completed"
            );
            return Ok(());
        }

        tracing::error!(
            identifier = %masked,
            event = "verification_contention",
            "Gave up after repeated concurrent modifications"
        );
        Err(DomainError::internal("verification attempt kept changing concurrently"))
    }

    /// Read-only lookup of the attempt stored under `key`
    pub async fn attempt(&self, key: &VerificationKey) -> DomainResult<Option<VerificationData>> {
        Ok(self.store.get(key).await?)
    }

    /// Count one wrong proof against `current`.
    ///
    /// Returns the rejection to report, or `None` when a concurrent change
    /// won the compare-and-swap and the caller should re-read.
    async fn record_failure(
        &self,
        current: &VerificationData,
        masked: &str,
    ) -> DomainResult<Option<DomainError>> {
        let mut failed = current.clone();
        failed.attempts += 1;
        if failed.attempts >= self.config.max_attempts {
            failed.status = AttemptStatus::Exhausted;
        }
        if !self.store.compare_and_swap(current, failed.clone()).await? {
            return Ok(None);
        }

        if failed.status == AttemptStatus::Exhausted {
            tracing::warn!(
                identifier = %masked,
                attempt_id = %current.id,
                attempts = failed.attempts,
                event = "verification_exhausted",
                "Maximum verification attempts exceeded"
            );
            return Ok(Some(DomainError::Exhausted));
        }

        let remaining_attempts = self.remaining_attempts(&failed);
        tracing::warn!(
            identifier = %masked,
            attempt_id = %current.id,
            verification_type = %current.verification_type,
            remaining_attempts,
            event = "verification_failed",
            "Verification credential mismatch"
        );
        Ok(Some(DomainError::InvalidCredential { remaining_attempts }))
    }

    fn remaining_attempts(&self, attempt: &VerificationData) -> u32 {
        self.config.max_attempts.saturating_sub(attempt.attempts)
    }

    fn check_identifier(&self, key: &VerificationKey) -> DomainResult<()> {
        let (valid, message) = match key.verification_type.rules().channel {
            DeliveryChannel::Email => (is_valid_email(&key.identifier), "Invalid email format"),
            DeliveryChannel::Sms => (
                self.sms.is_valid_phone_number(&key.identifier),
                "Invalid phone number format",
            ),
        };
        if valid {
            return Ok(());
        }
        let error = ValidationError::new("identifier", ValidationErrorKind::InvalidFormat, message)
            .with_metadata("value", key.identifier.as_str());
        Err(DomainError::ValidationFailed(error.into()))
    }

    async fn deliver(
        &self,
        attempt: &VerificationData,
        policy: &VerificationPolicy,
        username: &str,
    ) -> Result<(), DeliveryError> {
        match policy.channel {
            DeliveryChannel::Email => self.mail.send(self.compose_mail(attempt, policy, username)).await,
            DeliveryChannel::Sms => {
                let code = attempt
                    .code
                    .as_deref()
                    .ok_or_else(|| DeliveryError::Sms("attempt carries no code".to_string()))?;
                self.sms
                    .send_code(&attempt.subject_identifier, code, policy.expiry.num_minutes())
                    .await
            }
        }
    }

    fn compose_mail(
        &self,
        attempt: &VerificationData,
        policy: &VerificationPolicy,
        username: &str,
    ) -> Mail {
        let links = &self.config.links;
        Mail {
            from: self.config.from_address.clone(),
            to: vec![attempt.subject_identifier.clone()],
            subject: policy.mail_kind.default_subject().to_string(),
            kind: policy.mail_kind,
            data: MailData {
                username: username.to_string(),
                code: attempt.code.clone(),
                token: attempt.token.clone(),
                expires_in_minutes: policy.expiry.num_minutes(),
                base_url: links.base_url.clone(),
                verify_endpoint: links.verify_endpoint.clone(),
                reset_pass_endpoint: links.reset_pass_endpoint.clone(),
            },
        }
    }
}

fn check_deadline(deadline: Option<Instant>) -> DomainResult<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(DomainError::DeadlineExceeded),
        _ => Ok(()),
    }
}

/// Compare submitted secrets against the stored ones per the type's proof rule
fn proof_matches(stored: &VerificationData, request: &ValidatedRequest) -> bool {
    let token_ok = secret_matches(stored.token.as_deref(), request.token());
    let code_ok = secret_matches(stored.code.as_deref(), request.code());
    match stored.verification_type.rules().proof {
        ProofRule::TokenOrCode if request.token().is_some() => token_ok,
        ProofRule::TokenOrCode | ProofRule::CodeOnly => code_ok,
        ProofRule::TokenAndCode => token_ok && code_ok,
    }
}

fn secret_matches(stored: Option<&str>, submitted: Option<&str>) -> bool {
    match (stored, submitted) {
        (Some(stored), Some(submitted)) => constant_time_eq(stored.as_bytes(), submitted.as_bytes()),
        _ => false,
    }
}
