use crate::errors::ThrottleError;
use async_trait::async_trait;

pub mod memory;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bump the counter for `key`, starting a fresh window of
    /// `window_seconds` if none is active, and return the updated count.
    async fn increment_rate_limit(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<u32, ThrottleError>;

    /// Drop the counter for `key`.
    async fn reset_rate_limit(&self, key: &str) -> Result<(), ThrottleError>;

    /// Remove counters whose window has ended. Returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, ThrottleError>;
}

pub mod redis;
pub use self::memory::InMemoryStorage;
pub use self::redis::RedisStorage;
