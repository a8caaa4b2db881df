//! Redis-backed verification attempt store
//!
//! Attempts are stored as JSON under `{prefix}:{type}:{identifier}` with a TTL
//! of the remaining validity plus the retention window. Compare-and-swap runs
//! as a Lua script so concurrent replicas cannot both apply a transition.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use redis::Script;
use tracing::warn;

use bl_core::domain::entities::{VerificationData, VerificationKey};
use bl_core::errors::StoreError;
use bl_core::services::verification::VerificationStore;

use super::retention_secs;
use crate::cache::RedisClient;
use crate::InfrastructureError;

/// ARGV: expected id, expected status, expected attempts, new value, ttl seconds
static COMPARE_AND_SWAP: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local current = redis.call('GET', KEYS[1])
if not current then
    return 0
end
local stored = cjson.decode(current)
if stored['id'] ~= ARGV[1]
    or stored['status'] ~= ARGV[2]
    or tostring(stored['attempts']) ~= ARGV[3] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[4], 'EX', tonumber(ARGV[5]))
return 1
"#,
    )
});

#[derive(Clone)]
pub struct RedisVerificationStore {
    client: RedisClient,
    prefix: String,
}

impl RedisVerificationStore {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Connect to `url` and namespace keys under `prefix`
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, InfrastructureError> {
        Ok(Self::new(RedisClient::connect(url).await?, prefix))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn redis_key(&self, key: &VerificationKey) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn encode(data: &VerificationData) -> Result<String, StoreError> {
        serde_json::to_string(data).map_err(|e| InfrastructureError::from(e).into())
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn put(&self, data: VerificationData) -> Result<(), StoreError> {
        let key = self.redis_key(&data.key());
        let value = Self::encode(&data)?;
        let ttl = retention_secs(&data, Utc::now());
        self.client.set_with_expiry(&key, &value, ttl).await?;
        Ok(())
    }

    async fn get(&self, key: &VerificationKey) -> Result<Option<VerificationData>, StoreError> {
        let redis_key = self.redis_key(key);
        match self.client.get(&redis_key).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                warn!(key = %redis_key, "Stored verification attempt is not decodable");
                InfrastructureError::from(e).into()
            }),
            None => Ok(None),
        }
    }

    async fn compare_and_swap(
        &self,
        expected: &VerificationData,
        new: VerificationData,
    ) -> Result<bool, StoreError> {
        let key = self.redis_key(&expected.key());
        let args = [
            expected.id.to_string(),
            expected.status.as_str().to_string(),
            expected.attempts.to_string(),
            Self::encode(&new)?,
            retention_secs(&new, Utc::now()).to_string(),
        ];
        let swapped = self.client.eval_script(&COMPARE_AND_SWAP, &key, &args).await?;
        Ok(swapped == 1)
    }

    async fn remove(&self, key: &VerificationKey) -> Result<(), StoreError> {
        self.client.delete(&self.redis_key(key)).await?;
        Ok(())
    }
}
