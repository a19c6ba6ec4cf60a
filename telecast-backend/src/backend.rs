use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use telecast_core::{CachedValue, StateKey};

use crate::{BackendError, DeleteStatus};

pub type BackendResult<T> = Result<T, BackendError>;

/// Raw key/value store with per-entry TTL.
///
/// Absence is `Ok(None)`, never an error; a rejected write is an `Err`,
/// distinct from a missing value. The TTL travels inside the
/// [`CachedValue`] envelope and the store must stop returning an entry once
/// its expiry passes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>>;

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()>;

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus>;

    /// Short name of this backend for log lines.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
