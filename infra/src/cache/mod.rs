//! Cache module for Redis access
//!
//! Provides the Redis client shared by the Redis attempt store, with
//! connection retry and the handful of commands the store needs.

pub mod redis_client;

pub use redis_client::RedisClient;
