use crate::errors::ThrottleError;
use crate::storage::Storage;
use async_trait::async_trait;
use redis::AsyncCommands;

pub struct RedisStorage {
    client: redis::Client,
}

impl RedisStorage {
    pub fn new(redis_url: &str) -> Result<Self, ThrottleError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn increment_rate_limit(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<u32, ThrottleError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let count: u32 = conn.incr(key, 1).await?;
        if count == 1 {
            conn.expire::<_, ()>(key, window_seconds as i64).await?;
        }
        Ok(count)
    }

    async fn reset_rate_limit(&self, key: &str) -> Result<(), ThrottleError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, ThrottleError> {
        // Redis expires counter keys on its own.
        Ok(0)
    }
}
