use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThrottleError {
    /// The deny outcome. Display carries the user-facing message verbatim;
    /// it must never be swapped for a generic rate-limit wording.
    #[error("Quá nhiều lần đăng nhập thất bại. Vui lòng thử lại sau 15 phút.")]
    Throttled,

    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}
