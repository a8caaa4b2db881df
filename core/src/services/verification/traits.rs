//! Collaborator traits for storage, delivery and token authority

use async_trait::async_trait;

use crate::domain::entities::{AccessGrant, Mail, VerificationData, VerificationKey};
use crate::errors::{DeliveryError, DomainResult, StoreError};

/// Storage of outstanding verification attempts, one per key
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store an attempt, replacing any attempt under the same key
    async fn put(&self, data: VerificationData) -> Result<(), StoreError>;

    async fn get(&self, key: &VerificationKey) -> Result<Option<VerificationData>, StoreError>;

    /// Replace the stored attempt with `new` only if it is still at the
    /// revision of `expected` (see [`VerificationData::same_revision`]).
    /// Returns `false` when another writer got there first.
    async fn compare_and_swap(
        &self,
        expected: &VerificationData,
        new: VerificationData,
    ) -> Result<bool, StoreError>;

    async fn remove(&self, key: &VerificationKey) -> Result<(), StoreError>;
}

/// Delivery of formatted mail
#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), DeliveryError>;
}

/// Delivery of codes by SMS
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        expires_in_minutes: i64,
    ) -> Result<(), DeliveryError>;

    /// Check if the phone number format is valid
    fn is_valid_phone_number(&self, phone: &str) -> bool;
}

/// External service that owns access tokens and user credentials
#[async_trait]
pub trait AccessAuthority: Send + Sync {
    async fn validate_access_token(&self, token: &str) -> DomainResult<AccessGrant>;

    async fn apply_password_reset(
        &self,
        token: &str,
        email: &str,
        new_password: &str,
    ) -> DomainResult<()>;
}
