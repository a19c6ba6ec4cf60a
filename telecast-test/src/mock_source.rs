use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use telecast_device::{ClientError, StateSource};

/// Source that always returns a clone of one snapshot, counting calls.
#[derive(Clone, Debug)]
pub struct FixedSource<T> {
    state: T,
    calls: Arc<AtomicUsize>,
}

impl<T> FixedSource<T> {
    pub fn new(state: T) -> Self {
        FixedSource {
            state,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times the source was fetched.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> StateSource<T> for FixedSource<T> {
    async fn fetch(&self) -> Result<T, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.clone())
    }
}

/// Wraps any source and counts how often it is fetched.
///
/// Pair it with a `DeviceClient` pointed at a dead address to model an
/// unreachable television — the client produces the same transport errors
/// the real thing would.
#[derive(Clone, Debug)]
pub struct CountingSource<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        CountingSource {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Send, S: StateSource<T>> StateSource<T> for CountingSource<S> {
    async fn fetch(&self) -> Result<T, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch().await
    }
}
