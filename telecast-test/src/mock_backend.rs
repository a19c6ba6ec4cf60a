use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use telecast_backend::{Backend, BackendError, BackendResult, DeleteStatus};
use telecast_core::{CachedValue, StateKey};

#[derive(Debug, Default)]
pub struct BackendCounters {
    pub read_count: AtomicUsize,
    pub read_hit_count: AtomicUsize,
    pub read_miss_count: AtomicUsize,
    pub write_count: AtomicUsize,
    pub remove_count: AtomicUsize,
}

impl BackendCounters {
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn read_hit_count(&self) -> usize {
        self.read_hit_count.load(Ordering::SeqCst)
    }

    pub fn read_miss_count(&self) -> usize {
        self.read_miss_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    pub fn remove_count(&self) -> usize {
        self.remove_count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.read_hit_count.store(0, Ordering::SeqCst);
        self.read_miss_count.store(0, Ordering::SeqCst);
        self.write_count.store(0, Ordering::SeqCst);
        self.remove_count.store(0, Ordering::SeqCst);
    }
}

/// In-memory backend with operation counters.
///
/// Honors entry expiry on read, so TTL-driven behavior is observable
/// without a real store.
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    pub cache: Arc<DashMap<StateKey, CachedValue<Bytes>>>,
    pub counters: Arc<BackendCounters>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_count(&self) -> usize {
        self.counters.read_count()
    }

    pub fn write_count(&self) -> usize {
        self.counters.write_count()
    }

    pub fn cache_entry_count(&self) -> usize {
        self.cache.len()
    }

    pub fn reset_counters(&self) {
        self.counters.reset();
    }

    /// Raw bytes currently stored under `key`, if any.
    pub fn raw_entry(&self, key: &StateKey) -> Option<Bytes> {
        self.cache.get(key).map(|v| v.value().data().clone())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn read(&self, key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        let result = self
            .cache
            .get(key)
            .map(|v| v.value().clone())
            .filter(|v| !v.is_expired());
        if result.is_some() {
            self.counters.read_hit_count.fetch_add(1, Ordering::SeqCst);
        } else {
            self.counters.read_miss_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(result)
    }

    async fn write(&self, key: &StateKey, value: CachedValue<Bytes>) -> BackendResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        self.cache.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &StateKey) -> BackendResult<DeleteStatus> {
        self.counters.remove_count.fetch_add(1, Ordering::SeqCst);
        match self.cache.remove(key) {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Backend whose store is always unreachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    async fn read(&self, _key: &StateKey) -> BackendResult<Option<CachedValue<Bytes>>> {
        Err(BackendError::Connection("store unreachable".into()))
    }

    async fn write(&self, _key: &StateKey, _value: CachedValue<Bytes>) -> BackendResult<()> {
        Err(BackendError::Connection("store unreachable".into()))
    }

    async fn remove(&self, _key: &StateKey) -> BackendResult<DeleteStatus> {
        Err(BackendError::Connection("store unreachable".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
