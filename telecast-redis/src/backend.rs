//! Redis backend implementation.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use redis::{Client, aio::ConnectionManager};
use telecast_backend::{Backend, BackendError, BackendResult, DeleteStatus};
use telecast_core::{CachedValue, StateKey};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

/// Redis cache backend based on the redis-rs crate.
///
/// Uses a [`ConnectionManager`] for asynchronous network interaction; the
/// connection is established lazily on the first operation. Entries are
/// plain string keys written with `PX`, so the server itself enforces the
/// TTL.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisBackend {
    /// Create new backend instance with default settings.
    pub fn new() -> Result<Self, BackendError> {
        Ok(Self::builder().build()?)
    }

    /// Creates new RedisBackend builder with default settings.
    #[must_use]
    pub fn builder() -> RedisBackendBuilder {
        RedisBackendBuilder::default()
    }

    /// Create lazy connection to redis via [`ConnectionManager`].
    pub async fn connection(&self) -> Result<&ConnectionManager, BackendError> {
        trace!("Get connection manager");
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("Initialize new redis connection manager");
                self.client.get_connection_manager()
            })
            .await
            .map_err(Error::from)?;
        Ok(manager)
    }
}

/// Part of builder pattern implementation for RedisBackend.
pub struct RedisBackendBuilder {
    connection_info: String,
}

impl Default for RedisBackendBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
        }
    }
}

impl RedisBackendBuilder {
    /// Set connection info (host, port, database, etc.) for RedisBackend.
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Create new instance of Redis backend with passed settings.
    pub fn build(self) -> Result<RedisBackend, Error> {
        Ok(RedisBackend {
            client: Client::open(self.connection_info)?,
            connection: OnceCell::new(),
        })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        let mut con = self.connection().await?.clone();

        // Pipeline: GET + PTTL so the expiry survives the round trip.
        // PTTL returns -2 if the key doesn't exist, -1 if no TTL, else
        // milliseconds remaining.
        let (data, pttl): (Option<Vec<u8>>, i64) = redis::pipe()
            .cmd("GET")
            .arg(key.as_str())
            .cmd("PTTL")
            .arg(key.as_str())
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;

        let data = match data {
            Some(data) => Bytes::from(data),
            None => return Ok(None),
        };

        let expire = (pttl > 0).then(|| Utc::now() + chrono::Duration::milliseconds(pttl));

        Ok(Some(CachedValue::new(data, expire)))
    }

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();

        // An already-lapsed value must not resurrect the key.
        if value.is_expired() {
            let _: i64 = redis::cmd("DEL")
                .arg(key.as_str())
                .query_async(&mut con)
                .await
                .map_err(Error::from)?;
            return Ok(());
        }

        let mut cmd = redis::cmd("SET");
        cmd.arg(key.as_str()).arg(value.data().as_ref());
        if let Some(ttl) = value.ttl() {
            cmd.arg("PX").arg(ttl.as_millis() as u64);
        }

        cmd.query_async::<()>(&mut con).await.map_err(Error::from)?;
        Ok(())
    }

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus> {
        let mut con = self.connection().await?.clone();

        let deleted: i32 = redis::cmd("DEL")
            .arg(key.as_str())
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;

        if deleted > 0 {
            Ok(DeleteStatus::Deleted(deleted as u32))
        } else {
            Ok(DeleteStatus::Missing)
        }
    }

    fn name(&self) -> &str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_connection_info_fails_at_build() {
        let result = RedisBackend::builder().server("not a redis url").build();
        assert!(result.is_err());
    }
}
