//! In-memory verification attempt store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use bl_core::domain::entities::{VerificationData, VerificationKey};
use bl_core::errors::StoreError;
use bl_core::services::verification::VerificationStore;

use super::retention_after_expiry;

/// Attempts held in a map behind an async lock.
///
/// Entries older than their expiry plus the retention window are dropped
/// whenever a new attempt is stored.
#[derive(Debug, Default)]
pub struct MemoryVerificationStore {
    attempts: RwLock<HashMap<VerificationKey, VerificationData>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attempts currently held
    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn put(&self, data: VerificationData) -> Result<(), StoreError> {
        let cutoff = Utc::now() - retention_after_expiry();
        let mut attempts = self.attempts.write().await;

        let before = attempts.len();
        attempts.retain(|_, attempt| attempt.expires_at > cutoff);
        let pruned = before - attempts.len();
        if pruned > 0 {
            debug!(pruned, "Pruned stale verification attempts");
        }

        attempts.insert(data.key(), data);
        Ok(())
    }

    async fn get(&self, key: &VerificationKey) -> Result<Option<VerificationData>, StoreError> {
        Ok(self.attempts.read().await.get(key).cloned())
    }

    async fn compare_and_swap(
        &self,
        expected: &VerificationData,
        new: VerificationData,
    ) -> Result<bool, StoreError> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(&expected.key()) {
            Some(current) if current.same_revision(expected) => {
                *current = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, key: &VerificationKey) -> Result<(), StoreError> {
        self.attempts.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::domain::entities::{AttemptStatus, VerificationType};
    use chrono::Duration;

    fn attempt(identifier: &str) -> VerificationData {
        VerificationData::issue(
            VerificationKey::new(VerificationType::TwoFactorEmail, identifier),
            None,
            Some("123456".to_string()),
            Utc::now(),
            Duration::minutes(5),
        )
    }

    #[tokio::test]
    async fn test_put_replaces_attempt_for_same_key() {
        let store = MemoryVerificationStore::new();
        let first = attempt("user@example.com");
        let second = attempt("user@example.com");
        store.put(first).await.unwrap();
        store.put(second.clone()).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get(&second.key()).await.unwrap().unwrap();
        assert_eq!(stored.id, second.id);
    }

    #[tokio::test]
    async fn test_compare_and_swap_requires_matching_revision() {
        let store = MemoryVerificationStore::new();
        let issued = attempt("user@example.com");
        store.put(issued.clone()).await.unwrap();

        let pending = issued.with_status(AttemptStatus::Pending);
        assert!(store.compare_and_swap(&issued, pending.clone()).await.unwrap());

        // `issued` is no longer the stored revision
        let verified = issued.with_status(AttemptStatus::Verified);
        assert!(!store.compare_and_swap(&issued, verified).await.unwrap());

        let stored = store.get(&issued.key()).await.unwrap().unwrap();
        assert_eq!(stored.status, AttemptStatus::Pending);
    }

    #[tokio::test]
    async fn test_compare_and_swap_on_missing_key() {
        let store = MemoryVerificationStore::new();
        let issued = attempt("ghost@example.com");
        let pending = issued.with_status(AttemptStatus::Pending);
        assert!(!store.compare_and_swap(&issued, pending).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stale_attempts_are_pruned_on_put() {
        let store = MemoryVerificationStore::new();
        let mut stale = attempt("old@example.com");
        stale.expires_at = Utc::now() - Duration::hours(2);
        store.put(stale.clone()).await.unwrap();

        store.put(attempt("new@example.com")).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.get(&stale.key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryVerificationStore::new();
        let data = attempt("user@example.com");
        store.put(data.clone()).await.unwrap();
        store.remove(&data.key()).await.unwrap();
        assert!(store.get(&data.key()).await.unwrap().is_none());
    }
}
