//! Verification attempt stores
//!
//! - `MemoryVerificationStore`: process-local, for development and single-replica runs
//! - `RedisVerificationStore`: shared across replicas, compare-and-swap in a Lua script

use chrono::{DateTime, Duration, Utc};

use bl_core::domain::entities::VerificationData;

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis_store;

pub use memory::MemoryVerificationStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisVerificationStore;

/// Seconds a finished or expired attempt stays readable after `expires_at`
pub const RETENTION_AFTER_EXPIRY_SECS: i64 = 3600;

pub(crate) fn retention_after_expiry() -> Duration {
    Duration::seconds(RETENTION_AFTER_EXPIRY_SECS)
}

/// Whole seconds an attempt should live in a store, at least one
pub(crate) fn retention_secs(data: &VerificationData, now: DateTime<Utc>) -> u64 {
    let remaining = (data.expires_at + retention_after_expiry() - now).num_seconds();
    remaining.max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::domain::entities::{VerificationKey, VerificationType};

    #[test]
    fn test_retention_covers_expiry_plus_an_hour() {
        let now = Utc::now();
        let key = VerificationKey::new(VerificationType::TwoFactorEmail, "a@b.io");
        let data = VerificationData::issue(key, None, None, now, Duration::minutes(5));
        assert_eq!(retention_secs(&data, now), 3900);

        let stale = Utc::now() + Duration::hours(3);
        assert_eq!(retention_secs(&data, stale), 1);
    }
}
