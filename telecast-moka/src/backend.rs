//! Moka backend implementation.

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use telecast_backend::{Backend, BackendResult, DeleteStatus};
use telecast_core::{CachedValue, StateKey};

use crate::builder::MokaBackendBuilder;

/// In-memory cache backend powered by Moka.
///
/// Entries carry their own expiry; a custom [`moka::Expiry`] policy maps it
/// to Moka's per-entry TTL so the store itself stops returning lapsed
/// entries.
#[derive(Clone)]
pub struct MokaBackend {
    cache: Cache<StateKey, CachedValue<Bytes>>,
}

impl MokaBackend {
    /// Creates a builder holding at most `max_capacity` entries.
    pub fn builder(max_capacity: u64) -> MokaBackendBuilder {
        MokaBackendBuilder::new(max_capacity)
    }

    pub(crate) fn from_cache(cache: Cache<StateKey, CachedValue<Bytes>>) -> Self {
        MokaBackend { cache }
    }

    /// Access to the underlying Moka cache.
    pub fn cache(&self) -> &Cache<StateKey, CachedValue<Bytes>> {
        &self.cache
    }
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()> {
        self.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        "moka"
    }
}
