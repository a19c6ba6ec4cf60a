use std::sync::Arc;
use std::time::Duration;

use telecast_backend::{Backend, BackendError, StateCache};
use telecast_core::{ChangeNotification, StateKind};
use telecast_device::StateSource;
use telecast_events::{Notifier, Publisher};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::error::ControlError;

/// Read-through cache with event-driven refresh for one state category.
///
/// Two independent flows share the cache key: [`get`](Self::get) serves
/// reads, [`apply`](Self::apply) folds inbound change notifications in.
/// They may run concurrently; the last writer to the key wins, which is
/// acceptable because the cached snapshot is a point-in-time hint, never
/// authoritative.
pub struct StateOrchestrator<T, B, S> {
    cache: StateCache<T, B>,
    source: S,
    notifier: Notifier,
    publisher: Option<Arc<dyn Publisher>>,
    ttl: Option<Duration>,
}

impl<T, B, S> StateOrchestrator<T, B, S>
where
    T: StateKind,
    B: Backend,
    S: StateSource<T>,
{
    /// Creates an orchestrator caching `T` under its well-known key.
    pub fn new(backend: B, source: S, notifier: Notifier) -> Self {
        StateOrchestrator {
            cache: StateCache::new(backend),
            source,
            notifier,
            publisher: None,
            ttl: None,
        }
    }

    /// Expires written entries `ttl` after each write.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Re-publishes applied notifications to the broker, best-effort.
    pub fn with_publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns the current state, preferring the cache.
    ///
    /// On a miss (or an unreachable cache) the device is queried and the
    /// result written back; the write-back is best-effort — the freshly
    /// fetched state is returned even if the store rejects it. A failed
    /// fetch propagates and leaves the cache untouched.
    pub async fn get(&self) -> Result<T, ControlError> {
        match self.cache.read().await {
            Ok(Some(state)) => {
                trace!(key = %self.cache.key(), "cache hit");
                return Ok(state);
            }
            Ok(None) => {}
            Err(error) => {
                warn!(key = %self.cache.key(), %error, "cache read failed, falling back to the device");
            }
        }

        let state = self.source.fetch().await?;
        if let Err(error) = self.write_back(&state).await {
            warn!(key = %self.cache.key(), %error, "write-back rejected, returning fetched state anyway");
        }
        Ok(state)
    }

    /// Folds an inbound change-notification payload into the cache.
    ///
    /// A cache write only ever follows a successful decode; a payload that
    /// does not decode (or carries the wrong category) changes nothing and
    /// emits nothing. After a successful write the notification goes to
    /// in-process subscribers and, when a publisher is attached, back onto
    /// the broker — that publish is best-effort and never rolls back the
    /// write.
    pub async fn apply(&self, payload: &[u8]) -> Result<T, ControlError> {
        let notification: ChangeNotification =
            serde_json::from_slice(payload).map_err(ControlError::Decode)?;
        let actual = notification.category();
        let state = T::from_notification(notification).ok_or(ControlError::CategoryMismatch {
            expected: T::CATEGORY,
            actual,
        })?;

        self.write_back(&state).await?;

        let notification = state.clone().into_notification();
        let reached = self.notifier.notify(notification.clone());
        debug!(key = %self.cache.key(), reached, "applied change notification");

        if let Some(publisher) = &self.publisher {
            let topic = T::CATEGORY.notification_topic();
            match serde_json::to_vec(&notification) {
                Ok(body) => {
                    if let Err(error) = publisher.publish(topic, body.into()).await {
                        warn!(topic, %error, "outbound notification failed, cache write stands");
                    }
                }
                Err(error) => warn!(topic, %error, "notification did not serialize"),
            }
        }

        Ok(state)
    }

    /// Subscribes to this state's in-process notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.notifier.subscribe(T::CATEGORY)
    }

    async fn write_back(&self, state: &T) -> Result<(), BackendError> {
        match self.ttl {
            Some(ttl) => self.cache.write_ttl(state, ttl).await,
            None => self.cache.write(state).await,
        }
    }
}
