//! Redis Streams broker.
//!
//! Publishing is an `XADD` per message. Subscriptions are consumer groups:
//! [`RedisStreamSubscriber`] pulls with `XREADGROUP … BLOCK … COUNT …` and
//! acknowledges with `XACK`, so an un-acked delivery stays in the group's
//! pending list and is handed out again — at-least-once, in send order per
//! stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use smol_str::SmolStr;
use telecast_events::{ConsumeError, Delivery, PublishError, Publisher, Subscriber};
use tokio::sync::OnceCell;
use tracing::{trace, warn};

use crate::error::Error;

/// Field under which the message payload travels in a stream entry.
const PAYLOAD_FIELD: &str = "data";

fn consume_error(error: Error) -> ConsumeError {
    if error.is_unreachable() {
        ConsumeError::Connection(Box::new(error))
    } else {
        ConsumeError::Protocol(Box::new(error))
    }
}

/// Settings for one consumer-group subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// Stream (topic) to read.
    pub topic: SmolStr,
    /// Consumer group; created with `MKSTREAM` if missing.
    pub group: SmolStr,
    /// Consumer name within the group.
    pub consumer: SmolStr,
    /// How long one pull blocks waiting for entries.
    pub block: Duration,
    /// Maximum entries per pull.
    pub count: usize,
}

impl SubscriptionConfig {
    pub fn new(topic: impl Into<SmolStr>, group: impl Into<SmolStr>) -> Self {
        SubscriptionConfig {
            topic: topic.into(),
            group: group.into(),
            consumer: SmolStr::new_static("telecast"),
            block: Duration::from_secs(5),
            count: 16,
        }
    }

    pub fn consumer(mut self, consumer: impl Into<SmolStr>) -> Self {
        self.consumer = consumer.into();
        self
    }
}

/// Publisher half of the Redis Streams broker.
#[derive(Clone)]
pub struct RedisStreamBroker {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStreamBroker {
    /// Connects lazily to the given server.
    pub fn new(connection_info: impl Into<String>) -> Result<Self, Error> {
        Ok(RedisStreamBroker {
            client: Client::open(connection_info.into())?,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<&ConnectionManager, Error> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("Initialize new redis connection manager");
                self.client.get_connection_manager()
            })
            .await?;
        Ok(manager)
    }

    /// Opens a consumer-group subscription, creating the group if needed.
    pub async fn subscribe(
        &self,
        config: SubscriptionConfig,
    ) -> Result<RedisStreamSubscriber, Error> {
        let mut con = self.connection().await?.clone();

        // XGROUP CREATE fails with BUSYGROUP when the group already
        // exists; that just means another instance got there first.
        let created: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(config.topic.as_str())
            .arg(config.group.as_str())
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut con)
            .await;
        if let Err(error) = created
            && error.code() != Some("BUSYGROUP")
        {
            return Err(error.into());
        }

        Ok(RedisStreamSubscriber {
            connection: con,
            config,
        })
    }
}

#[async_trait]
impl Publisher for RedisStreamBroker {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        let mut con = self
            .connection()
            .await
            .map_err(|e| PublishError::new(topic, e))?
            .clone();

        let id: String = redis::cmd("XADD")
            .arg(topic)
            .arg("*")
            .arg(PAYLOAD_FIELD)
            .arg(payload.as_ref())
            .query_async(&mut con)
            .await
            .map_err(|e| PublishError::new(topic, Error::from(e)))?;
        trace!(topic, id, "published stream entry");
        Ok(())
    }
}

/// Subscriber half: one consumer within a consumer group.
pub struct RedisStreamSubscriber {
    connection: ConnectionManager,
    config: SubscriptionConfig,
}

#[async_trait]
impl Subscriber for RedisStreamSubscriber {
    async fn next_batch(&mut self) -> Result<Vec<Delivery>, ConsumeError> {
        let options = StreamReadOptions::default()
            .group(self.config.group.as_str(), self.config.consumer.as_str())
            .block(self.config.block.as_millis() as usize)
            .count(self.config.count);

        let reply: StreamReadReply = self
            .connection
            .xread_options(&[self.config.topic.as_str()], &[">"], &options)
            .await
            .map_err(|e| consume_error(Error::from(e)))?;

        let mut deliveries = Vec::new();
        for stream in reply.keys {
            for entry in stream.ids {
                let Some(value) = entry.map.get(PAYLOAD_FIELD) else {
                    warn!(id = entry.id, "stream entry without payload field, skipping");
                    continue;
                };
                let payload: Vec<u8> = redis::from_redis_value_ref(value)
                    .map_err(|e| {
                        ConsumeError::Protocol(Box::new(Error::from(redis::RedisError::from(e))))
                    })?;
                deliveries.push(Delivery::new(entry.id.as_str(), payload));
            }
        }
        Ok(deliveries)
    }

    async fn ack(&mut self, id: &str) -> Result<(), ConsumeError> {
        let _acked: i64 = self
            .connection
            .xack(
                self.config.topic.as_str(),
                self.config.group.as_str(),
                &[id],
            )
            .await
            .map_err(|e| consume_error(Error::from(e)))?;
        Ok(())
    }
}
