//! Error types for Redis operations.

use redis::RedisError;
use telecast_backend::BackendError;

/// Error type for Redis backend and broker operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),
}

impl Error {
    /// Whether the server could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Error::Redis(error) => {
                error.is_io_error()
                    || error.is_timeout()
                    || error.is_connection_refusal()
                    || error.is_connection_dropped()
            }
        }
    }
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        if error.is_unreachable() {
            BackendError::Connection(Box::new(error))
        } else {
            BackendError::Internal(Box::new(error))
        }
    }
}
