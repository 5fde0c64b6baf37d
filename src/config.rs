#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub max_attempts: u32,
    pub window_seconds: u64,
    pub failure_policy: FailurePolicy,
    pub address_precedence: AddressPrecedence,
    pub storage_type: StorageType,
    pub redis_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageType {
    Memory,
    Redis,
}

/// What to do when the counter store itself fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePolicy {
    /// Surface the storage error to the caller unchanged.
    Propagate,
    /// Allow the attempt.
    Open,
    /// Deny the attempt.
    Closed,
}

/// Which address field identifies the client. Exact precedence depends on the
/// proxy setup in front of the service, so it is configuration rather than a
/// fixed rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddressPrecedence {
    /// Reported client address first, then the transport peer address.
    ForwardedThenRemote,
    /// Transport peer address only.
    RemoteOnly,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 900, // the 15 minutes named by the deny message
            failure_policy: FailurePolicy::Propagate,
            address_precedence: AddressPrecedence::ForwardedThenRemote,
            storage_type: StorageType::Redis,
            redis_url: "redis://127.0.0.1/".to_string(),
        }
    }
}

use crate::errors::ThrottleError;

impl ThrottleConfig {
    pub fn from_env() -> Result<Self, ThrottleError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LOGIN_THROTTLE_MAX_ATTEMPTS") {
            config.max_attempts = val.parse().map_err(|_| {
                ThrottleError::ConfigError("Invalid LOGIN_THROTTLE_MAX_ATTEMPTS".to_string())
            })?;
        }
        if let Ok(val) = std::env::var("LOGIN_THROTTLE_WINDOW_SECONDS") {
            config.window_seconds = val.parse().map_err(|_| {
                ThrottleError::ConfigError("Invalid LOGIN_THROTTLE_WINDOW_SECONDS".to_string())
            })?;
        }

        if let Ok(val) = std::env::var("LOGIN_THROTTLE_FAIL_POLICY") {
            config.failure_policy = match val.to_lowercase().as_str() {
                "propagate" => FailurePolicy::Propagate,
                "open" => FailurePolicy::Open,
                "closed" => FailurePolicy::Closed,
                _ => {
                    return Err(ThrottleError::ConfigError(
                        "Invalid LOGIN_THROTTLE_FAIL_POLICY: must be 'propagate', 'open' or 'closed'"
                            .to_string(),
                    ))
                }
            };
        }

        if let Ok(val) = std::env::var("LOGIN_THROTTLE_TRUST_FORWARDED") {
            config.address_precedence = if val.parse().unwrap_or(true) {
                AddressPrecedence::ForwardedThenRemote
            } else {
                AddressPrecedence::RemoteOnly
            };
        }

        if let Ok(val) = std::env::var("STORAGE_TYPE") {
            config.storage_type = match val.to_lowercase().as_str() {
                "memory" => StorageType::Memory,
                "redis" => StorageType::Redis,
                _ => {
                    return Err(ThrottleError::ConfigError(
                        "Invalid STORAGE_TYPE: must be 'memory' or 'redis'".to_string(),
                    ))
                }
            };
        }

        if config.storage_type == StorageType::Redis {
            let redis_host = std::env::var("REDIS_HOST")
                .map_err(|_| ThrottleError::ConfigError("REDIS_HOST must be set".to_string()))?;
            let redis_port = std::env::var("REDIS_PORT")
                .map_err(|_| ThrottleError::ConfigError("REDIS_PORT must be set".to_string()))?;

            config.redis_url = format!("redis://{}:{}/", redis_host, redis_port);
        }

        Ok(config)
    }
}
