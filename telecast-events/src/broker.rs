use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use smol_str::SmolStr;
use thiserror::Error;

/// One message pulled from a subscription, identified for acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Broker-assigned delivery id, monotonic within one topic.
    pub id: SmolStr,
    /// Raw message payload.
    pub payload: Bytes,
}

impl Delivery {
    pub fn new(id: impl Into<SmolStr>, payload: impl Into<Bytes>) -> Self {
        Delivery {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// The broker refused or failed an outbound publish.
///
/// Publishing is best-effort: a failure is reported to the caller but never
/// rolls back work (such as a cache write) already performed.
#[derive(Debug, Error)]
#[error("publish to topic `{topic}` failed")]
pub struct PublishError {
    pub topic: SmolStr,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl PublishError {
    pub fn new(
        topic: impl Into<SmolStr>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PublishError {
            topic: topic.into(),
            source: Box::new(source),
        }
    }
}

/// Errors while pulling from or acknowledging a subscription.
#[derive(Debug, Error)]
pub enum ConsumeError {
    /// Broker unreachable or the connection dropped.
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send + Sync>),
    /// The broker answered with something the client could not interpret.
    #[error(transparent)]
    Protocol(Box<dyn std::error::Error + Send + Sync>),
}

/// Best-effort topic publisher.
///
/// Within one (publisher, topic) pair the broker preserves send order;
/// there is no ordering guarantee across topics.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError>;
}

#[async_trait]
impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        (**self).publish(topic, payload).await
    }
}

/// Pull-style subscription with explicit acknowledgment.
///
/// Delivery is at-least-once: anything not acknowledged is handed out
/// again, so the same message may be seen more than once.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Waits for the next batch of deliveries. An empty batch is allowed.
    async fn next_batch(&mut self) -> Result<Vec<Delivery>, ConsumeError>;

    /// Marks one delivery as processed so it is not handed out again.
    async fn ack(&mut self, id: &str) -> Result<(), ConsumeError>;
}
