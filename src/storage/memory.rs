use crate::errors::ThrottleError;
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone)]
struct RateLimitEntry {
    count: u32,
    start_window: u64, // Unix timestamp
    window_seconds: u64,
}

pub struct InMemoryStorage {
    rate_limits: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            rate_limits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn increment_rate_limit(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<u32, ThrottleError> {
        let mut map = self
            .rate_limits
            .write()
            .map_err(|_| ThrottleError::StorageError("Lock poisoned".into()))?;
        let now = Self::now();

        let entry = map.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            start_window: now,
            window_seconds,
        });

        if now > entry.start_window + entry.window_seconds {
            entry.count = 1;
            entry.start_window = now;
            entry.window_seconds = window_seconds;
        } else {
            entry.count += 1;
        }

        Ok(entry.count)
    }

    async fn reset_rate_limit(&self, key: &str) -> Result<(), ThrottleError> {
        let mut map = self
            .rate_limits
            .write()
            .map_err(|_| ThrottleError::StorageError("Lock poisoned".into()))?;
        map.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, ThrottleError> {
        let mut map = self
            .rate_limits
            .write()
            .map_err(|_| ThrottleError::StorageError("Lock poisoned".into()))?;
        let now = Self::now();

        let before = map.len();
        map.retain(|_, entry| now <= entry.start_window + entry.window_seconds);
        Ok((before - map.len()) as u64)
    }
}
