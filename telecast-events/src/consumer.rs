use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::broker::{Delivery, Subscriber};

/// Backoff after a failed pull, so a dead broker connection does not spin.
const PULL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Why a handler did not process a delivery.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload could not be decoded. Redelivery can never succeed, so
    /// the consumer acknowledges and skips the message.
    #[error("malformed event payload")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Processing failed after a successful decode. The delivery is left
    /// unacknowledged and will be handed out again.
    #[error(transparent)]
    Apply(Box<dyn std::error::Error + Send + Sync>),
}

/// Processes one inbound delivery payload.
///
/// Called once per delivery; duplicates are possible (at-least-once), so
/// handling must be idempotent.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> Result<(), HandlerError>;
}

/// Pull loop binding one [`Subscriber`] to one [`Handler`].
///
/// Runs until the shutdown signal flips to `true`. A decode failure is
/// logged, acknowledged and skipped; an apply failure is logged and left
/// unacknowledged for redelivery; neither terminates the loop.
pub struct Consumer<S, H> {
    subscriber: S,
    handler: H,
}

impl<S, H> Consumer<S, H>
where
    S: Subscriber,
    H: Handler,
{
    pub fn new(subscriber: S, handler: H) -> Self {
        Consumer {
            subscriber,
            handler,
        }
    }

    /// Drives the loop until `shutdown` turns `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }
            let batch = tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                batch = self.subscriber.next_batch() => batch,
            };
            match batch {
                Ok(deliveries) => {
                    for delivery in deliveries {
                        self.dispatch(delivery).await;
                    }
                }
                Err(error) => {
                    warn!(%error, "pull failed, backing off");
                    tokio::time::sleep(PULL_RETRY_DELAY).await;
                }
            }
        }
        debug!("consumer loop stopped");
    }

    async fn dispatch(&mut self, delivery: Delivery) {
        let acknowledge = match self.handler.handle(&delivery.payload).await {
            Ok(()) => true,
            Err(HandlerError::Decode(error)) => {
                warn!(id = %delivery.id, %error, "dropping undecodable event");
                true
            }
            Err(HandlerError::Apply(error)) => {
                warn!(id = %delivery.id, %error, "handler failed, leaving delivery for retry");
                false
            }
        };
        if acknowledge
            && let Err(error) = self.subscriber.ack(&delivery.id).await
        {
            warn!(id = %delivery.id, %error, "acknowledgment failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;
    use smol_str::SmolStr;

    use super::*;
    use crate::broker::ConsumeError;

    struct ScriptedSubscriber {
        batches: VecDeque<Vec<Delivery>>,
        acks: Arc<Mutex<Vec<SmolStr>>>,
    }

    #[async_trait]
    impl Subscriber for ScriptedSubscriber {
        async fn next_batch(&mut self) -> Result<Vec<Delivery>, ConsumeError> {
            match self.batches.pop_front() {
                Some(batch) => Ok(batch),
                None => std::future::pending().await,
            }
        }

        async fn ack(&mut self, id: &str) -> Result<(), ConsumeError> {
            self.acks.lock().unwrap().push(SmolStr::new(id));
            Ok(())
        }
    }

    struct RecordingHandler {
        handled: Arc<Mutex<Vec<Bytes>>>,
    }

    #[async_trait]
    impl Handler for RecordingHandler {
        async fn handle(&self, payload: &[u8]) -> Result<(), HandlerError> {
            if payload.starts_with(b"{") {
                self.handled
                    .lock()
                    .unwrap()
                    .push(Bytes::copy_from_slice(payload));
                Ok(())
            } else {
                Err(HandlerError::Decode("not json".into()))
            }
        }
    }

    async fn wait_for(acks: &Arc<Mutex<Vec<SmolStr>>>, count: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while acks.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("consumer did not process deliveries in time");
    }

    #[tokio::test]
    async fn undecodable_delivery_is_acked_and_loop_continues() {
        let acks = Arc::new(Mutex::new(Vec::new()));
        let handled = Arc::new(Mutex::new(Vec::new()));
        let subscriber = ScriptedSubscriber {
            batches: VecDeque::from([vec![
                Delivery::new("1-0", Bytes::from_static(b"garbage")),
                Delivery::new("2-0", Bytes::from_static(b"{\"ok\":true}")),
            ]]),
            acks: acks.clone(),
        };
        let consumer = Consumer::new(
            subscriber,
            RecordingHandler {
                handled: handled.clone(),
            },
        );

        let (stop, shutdown) = watch::channel(false);
        let task = tokio::spawn(consumer.run(shutdown));

        wait_for(&acks, 2).await;
        stop.send(true).unwrap();
        task.await.unwrap();

        // Both were acked: the poison one was skipped, the second handled.
        assert_eq!(acks.lock().unwrap().as_slice(), ["1-0", "2-0"]);
        assert_eq!(handled.lock().unwrap().len(), 1);
    }

    struct FailingApplyHandler;

    #[async_trait]
    impl Handler for FailingApplyHandler {
        async fn handle(&self, _payload: &[u8]) -> Result<(), HandlerError> {
            Err(HandlerError::Apply("store down".into()))
        }
    }

    #[tokio::test]
    async fn apply_failure_leaves_delivery_unacked() {
        let acks = Arc::new(Mutex::new(Vec::new()));
        let subscriber = ScriptedSubscriber {
            batches: VecDeque::from([vec![Delivery::new("1-0", Bytes::from_static(b"{}"))]]),
            acks: acks.clone(),
        };
        let consumer = Consumer::new(subscriber, FailingApplyHandler);

        let (stop, shutdown) = watch::channel(false);
        let task = tokio::spawn(consumer.run(shutdown));

        tokio::time::sleep(Duration::from_millis(50)).await;
        stop.send(true).unwrap();
        task.await.unwrap();

        assert!(acks.lock().unwrap().is_empty());
    }
}
