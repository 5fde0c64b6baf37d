#![doc = include_str!("../README.md")]

#[cfg(feature = "axum")]
pub mod axum_api;
pub mod config;
pub mod cron;
pub mod errors;
pub mod identity;
pub mod rate_limit;
pub mod service;
pub mod storage;

pub use config::{AddressPrecedence, FailurePolicy, StorageType, ThrottleConfig};
pub use errors::ThrottleError;
pub use identity::{ClientIdentity, RequestMeta, ThrottleContext};
pub use rate_limit::{Decision, RateLimiter};
pub use service::ThrottleService;
pub use storage::{InMemoryStorage, RedisStorage, Storage};
