use async_trait::async_trait;

pub mod cache;
pub mod memory;
pub mod rate_limit;
pub mod redis_store;

pub use cache::Cache;
pub use memory::MemoryStore;
pub use rate_limit::{RateDecision, RateLimiter};
pub use redis_store::RedisStore;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value backend shared by the response cache and the rate limiter.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short backend name reported by the health check.
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError>;

    async fn del(&self, key: &str) -> Result<(), KvError>;

    /// Increments the counter at `key`. The expiry is only set when the window opens.
    /// Returns the new count and the seconds left in the window.
    async fn incr_window(&self, key: &str, window_secs: u64) -> Result<(u64, u64), KvError>;
}
