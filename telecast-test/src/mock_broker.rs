use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use smol_str::SmolStr;
use telecast_events::{ConsumeError, Delivery, PublishError, Publisher, Subscriber};

/// Publisher that records every published (topic, payload) pair.
#[derive(Clone, Debug, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<(SmolStr, Bytes)>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(SmolStr, Bytes)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((SmolStr::new(topic), payload));
        Ok(())
    }
}

/// Publisher whose broker rejects everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, topic: &str, _payload: Bytes) -> Result<(), PublishError> {
        Err(PublishError::new(
            topic,
            std::io::Error::other("broker down"),
        ))
    }
}

/// Subscriber fed from a fixed script of delivery batches.
///
/// Once the script is exhausted, `next_batch` pends forever — like a
/// blocking pull against an idle topic — so consumer-loop shutdown paths
/// stay exercisable. Acks are recorded for assertion.
pub struct ScriptedSubscriber {
    batches: VecDeque<Vec<Delivery>>,
    acks: Arc<Mutex<Vec<SmolStr>>>,
}

impl ScriptedSubscriber {
    pub fn new(batches: impl IntoIterator<Item = Vec<Delivery>>) -> Self {
        ScriptedSubscriber {
            batches: batches.into_iter().collect(),
            acks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded acknowledgments.
    pub fn acks(&self) -> Arc<Mutex<Vec<SmolStr>>> {
        self.acks.clone()
    }
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
