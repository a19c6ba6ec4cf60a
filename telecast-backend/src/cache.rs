use std::marker::PhantomData;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use telecast_core::{CachedValue, StateKey, StateKind};
use tracing::trace;

use crate::format::{Format, JsonFormat};
use crate::{Backend, BackendResult, DeleteStatus};

/// Typed cache over one well-known key.
///
/// Pairs a [`Backend`] with a [`Format`] so callers read and write
/// snapshots instead of bytes. A stored entry whose envelope is already
/// expired is reported as a miss even if the store still returned it, and a
/// payload that no longer decodes surfaces as a format error rather than a
/// stale value.
pub struct StateCache<T, B, F = JsonFormat> {
    backend: B,
    key: StateKey,
    format: F,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T, B, F: Clone> Clone for StateCache<T, B, F>
where
    B: Clone,
{
    fn clone(&self) -> Self {
        StateCache {
            backend: self.backend.clone(),
            key: self.key.clone(),
            format: self.format.clone(),
            _snapshot: PhantomData,
        }
    }
}

impl<T, B> StateCache<T, B>
where
    T: StateKind,
    B: Backend,
{
    /// Creates a cache for `T` under its well-known key, JSON-encoded.
    pub fn new(backend: B) -> Self {
        Self::with_format(backend, T::KEY, JsonFormat)
    }
}

impl<T, B, F> StateCache<T, B, F>
where
    T: Serialize + DeserializeOwned,
    B: Backend,
    F: Format,
{
    /// Creates a cache with an explicit key and format.
    pub fn with_format(backend: B, key: StateKey, format: F) -> Self {
        StateCache {
            backend,
            key,
            format,
            _snapshot: PhantomData,
        }
    }

    /// The key this cache reads and writes.
    pub fn key(&self) -> &StateKey {
        &self.key
    }

    /// Reads the cached snapshot; a miss or an expired entry is `Ok(None)`.
    pub async fn read(&self) -> BackendResult<Option<T>> {
        let Some(value) = self.backend.read(&self.key).await? else {
            trace!(key = %self.key, backend = self.backend.name(), "cache miss");
            return Ok(None);
        };
        if value.is_expired() {
            trace!(key = %self.key, "cached entry lapsed between store read and decode");
            return Ok(None);
        }
        let decoded = self.format.deserialize(value.data())?;
        Ok(Some(decoded))
    }

    /// Overwrites the entry without an expiry.
    pub async fn write(&self, value: &T) -> BackendResult<()> {
        let raw = self.format.serialize(value)?;
        self.backend
            .write(&self.key, CachedValue::eternal(raw))
            .await
    }

    /// Overwrites the entry, expiring it `ttl` from now.
    pub async fn write_ttl(&self, value: &T, ttl: Duration) -> BackendResult<()> {
        let raw = self.format.serialize(value)?;
        self.backend
            .write(&self.key, CachedValue::with_ttl(raw, ttl))
            .await
    }

    /// Drops the entry.
    pub async fn remove(&self) -> BackendResult<DeleteStatus> {
        self.backend.remove(&self.key).await
    }
}
