use crate::config::ThrottleConfig;
use crate::errors::ThrottleError;
use crate::storage::Storage;
use std::sync::Arc;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

pub struct RateLimiter {
    storage: Arc<dyn Storage>,
    config: ThrottleConfig,
}

impl RateLimiter {
    pub fn new(storage: Arc<dyn Storage>, config: ThrottleConfig) -> Self {
        Self { storage, config }
    }

    /// Count one attempt for `key` and decide whether it stays within the
    /// configured window.
    pub async fn decide(&self, key: &str) -> Result<Decision, ThrottleError> {
        let key = format!("login_throttle:{}", key);
        let count = self
            .storage
            .increment_rate_limit(&key, self.config.window_seconds)
            .await?;

        if count > self.config.max_attempts {
            return Ok(Decision::Denied);
        }
        Ok(Decision::Allowed)
    }

    /// Drop the counter for `key`.
    pub async fn reset(&self, key: &str) -> Result<(), ThrottleError> {
        let key = format!("login_throttle:{}", key);
        self.storage.reset_rate_limit(&key).await
    }
}
