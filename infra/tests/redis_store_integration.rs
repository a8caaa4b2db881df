//! Redis attempt store against a live server
//!
//! Run with `REDIS_URL` pointing at a disposable instance:
//! `cargo test -p bl_infra --test redis_store_integration -- --ignored`

#![cfg(feature = "redis-store")]

use chrono::{Duration, Utc};
use uuid::Uuid;

use bl_core::domain::entities::{AttemptStatus, VerificationData, VerificationKey, VerificationType};
use bl_core::services::verification::VerificationStore;
use bl_infra::RedisVerificationStore;

async fn store() -> RedisVerificationStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    // Unique prefix per test run keeps runs independent
    RedisVerificationStore::connect(&url, format!("test-{}", Uuid::new_v4()))
        .await
        .expect("Redis must be running for ignored tests")
}

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
#[ignore]
async fn test_health_check() {
    let store = store().await;
    assert!(store.client().health_check().await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_put_get_remove() {
    let store = store().await;
    let data = attempt("jane@example.com");

    store.put(data.clone()).await.unwrap();
    assert_eq!(store.get(&data.key()).await.unwrap(), Some(data.clone()));

    store.remove(&data.key()).await.unwrap();
    assert!(store.get(&data.key()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_compare_and_swap_by_revision() {
    let store = store().await;
    let issued = attempt("jane@example.com");
    store.put(issued.clone()).await.unwrap();

    let pending = issued.with_status(AttemptStatus::Pending);
    assert!(store.compare_and_swap(&issued, pending.clone()).await.unwrap());
    assert!(!store
        .compare_and_swap(&issued, issued.with_status(AttemptStatus::Verified))
        .await
        .unwrap());

    let mut failed_once = pending.clone();
    failed_once.attempts = 1;
    assert!(store.compare_and_swap(&pending, failed_once.clone()).await.unwrap());

    // Stale attempt count no longer matches
    assert!(!store
        .compare_and_swap(&pending, pending.with_status(AttemptStatus::Verified))
        .await
        .unwrap());

    assert_eq!(store.get(&issued.key()).await.unwrap(), Some(failed_once));
    store.remove(&issued.key()).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_compare_and_swap_against_replacement() {
    let store = store().await;
    let first = attempt("jane@example.com");
    store.put(first.clone()).await.unwrap();

    let replacement = attempt("jane@example.com");
    store.put(replacement.clone()).await.unwrap();

    assert!(!store
        .compare_and_swap(&first, first.with_status(AttemptStatus::Pending))
        .await
        .unwrap());
    store.remove(&first.key()).await.unwrap();
}
