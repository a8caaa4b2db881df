//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits declared in `bl_core`:
//!
//! - **Store**: in-memory and Redis-backed verification attempt stores
//! - **Cache**: Redis client with connection retry
//! - **Mail**: logging mail dispatcher resolving template paths
//! - **SMS**: logging SMS dispatcher with E.164 validation
//! - **Authority**: HTTP client for the external access token authority and a
//!   development stand-in
//!
//! ## Features
//!
//! - `redis-store`: Enable the Redis client and Redis attempt store (default)

use bl_core::errors::StoreError;

pub mod authority;
#[cfg(feature = "redis-store")]
pub mod cache;
pub mod mail;
pub mod sms;
pub mod store;

pub use authority::{DevAccessAuthority, HttpAccessAuthority};
pub use mail::LogMailDispatcher;
pub use sms::LogSmsDispatcher;
pub use store::MemoryVerificationStore;
#[cfg(feature = "redis-store")]
pub use store::RedisVerificationStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[cfg(feature = "redis-store")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stored payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Serialization(e) => StoreError::Corrupt(e.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
