//! Cache error types.

use thiserror::Error;

/// Errors raised by cache backends.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Unsupported cache backend '{0}'")]
    UnsupportedBackend(String),

    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    #[error("Failed to get Redis connection: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to open cache connection at {addr}: {reason}")]
    Connection { addr: String, reason: String },
}

impl CacheError {
    pub fn connection(addr: impl Into<String>, reason: impl ToString) -> Self {
        Self::Connection {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }
}
