//! Behavior tests for the event-driven refresh flow.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use telecast_control::{ControlError, RefreshHandler, StateOrchestrator};
use telecast_core::{
    ChangeNotification, ChannelState, EventCategory, StateKind, VolumeState,
};
use telecast_events::{Consumer, Delivery, Notifier};
use telecast_test::{
    FailingBackend, FailingPublisher, FixedSource, MockBackend, RecordingPublisher,
    ScriptedSubscriber,
};
use tokio::sync::watch;

fn volume(level: u8, muted: bool) -> VolumeState {
    VolumeState { level, muted }
}

fn volume_orchestrator<B: telecast_backend::Backend>(
    backend: B,
    notifier: Notifier,
) -> StateOrchestrator<VolumeState, B, FixedSource<VolumeState>> {
    StateOrchestrator::new(backend, FixedSource::new(volume(0, false)), notifier)
}

#[tokio::test]
async fn inbound_volume_change_updates_cache_and_notifies_once() {
    let backend = MockBackend::new();
    let notifier = Notifier::default();
    let publisher = RecordingPublisher::new();
    let orchestrator = volume_orchestrator(backend.clone(), notifier.clone())
        .with_publisher(Arc::new(publisher.clone()));

    let mut notifications = notifier.subscribe(EventCategory::VolumeChanged);

    let payload = br#"{"category":"VOLUME_CHANGED","level":55,"muted":true}"#;
    let state = orchestrator.apply(payload).await.unwrap();

    // Cache now holds the announced snapshot.
    assert_eq!(state, volume(55, true));
    assert_eq!(
        backend.raw_entry(&VolumeState::KEY).as_deref(),
        Some(br#"{"level":55,"muted":true}"#.as_slice())
    );

    // Exactly one in-process notification of the right category.
    let notification = notifications.recv().await.unwrap();
    assert_eq!(notification, ChangeNotification::VolumeChanged(volume(55, true)));
    assert!(notifications.try_recv().is_err());

    // And one outbound re-publish on the per-category topic.
    let published = publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "notification:volume-change");
    assert_eq!(
        published[0].1.as_ref(),
        br#"{"category":"VOLUME_CHANGED","level":55,"muted":true}"#.as_slice()
    );
}

#[tokio::test]
async fn undecodable_payload_leaves_cache_untouched() {
    let backend = MockBackend::new();
    let orchestrator = volume_orchestrator(backend.clone(), Notifier::default());

    let error = orchestrator.apply(b"level: fifty-five").await.unwrap_err();

    assert!(matches!(error, ControlError::Decode(_)));
    assert_eq!(backend.write_count(), 0);
    assert_eq!(backend.cache_entry_count(), 0);
}

#[tokio::test]
async fn wrong_category_is_rejected_without_a_write() {
    let backend = MockBackend::new();
    let orchestrator = volume_orchestrator(backend.clone(), Notifier::default());

    let channel = ChannelState {
        channel_id: "id".into(),
        channel_name: "M1 HD".into(),
        channel_number: "1".into(),
        channel_type_name: None,
    };
    let payload = serde_json::to_vec(&channel.into_notification()).unwrap();

    let error = orchestrator.apply(&payload).await.unwrap_err();
    assert!(matches!(
        error,
        ControlError::CategoryMismatch {
            expected: EventCategory::VolumeChanged,
            actual: EventCategory::ChannelChanged,
        }
    ));
    assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn publish_failure_does_not_undo_the_cache_write() {
    let backend = MockBackend::new();
    let orchestrator = volume_orchestrator(backend.clone(), Notifier::default())
        .with_publisher(Arc::new(FailingPublisher));

    let payload = br#"{"category":"VOLUME_CHANGED","level":10,"muted":false}"#;
    let state = orchestrator.apply(payload).await.unwrap();

    assert_eq!(state, volume(10, false));
    assert_eq!(backend.write_count(), 1);
}

#[tokio::test]
async fn duplicate_deliveries_are_idempotent() {
    let backend = MockBackend::new();
    let orchestrator = volume_orchestrator(backend.clone(), Notifier::default());

    let payload = br#"{"category":"VOLUME_CHANGED","level":55,"muted":true}"#;
    orchestrator.apply(payload).await.unwrap();
    orchestrator.apply(payload).await.unwrap();

    assert_eq!(backend.write_count(), 2);
    assert_eq!(
        backend.raw_entry(&VolumeState::KEY).as_deref(),
        Some(br#"{"level":55,"muted":true}"#.as_slice())
    );
}

async fn wait_for_acks(acks: &Arc<std::sync::Mutex<Vec<smol_str::SmolStr>>>, count: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while acks.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("consumer did not process deliveries in time");
}

#[tokio::test]
async fn subscription_survives_a_poison_message() {
    let backend = MockBackend::new();
    let orchestrator = Arc::new(volume_orchestrator(backend.clone(), Notifier::default()));

    let subscriber = ScriptedSubscriber::new([vec![
        Delivery::new("1-0", Bytes::from_static(b"not json")),
        Delivery::new(
            "2-0",
            Bytes::from_static(br#"{"category":"VOLUME_CHANGED","level":7,"muted":false}"#),
        ),
    ]]);
    let acks = subscriber.acks();
    let consumer = Consumer::new(subscriber, RefreshHandler::new(orchestrator));

    let (stop, shutdown) = watch::channel(false);
    let task = tokio::spawn(consumer.run(shutdown));

    wait_for_acks(&acks, 2).await;
    stop.send(true).unwrap();
    task.await.unwrap();

    // The poison message was acknowledged and skipped; the one behind it
    // still refreshed the cache.
    assert_eq!(acks.lock().unwrap().as_slice(), ["1-0", "2-0"]);
    assert_eq!(
        backend.raw_entry(&VolumeState::KEY).as_deref(),
        Some(br#"{"level":7,"muted":false}"#.as_slice())
    );
}

#[tokio::test]
async fn apply_failure_leaves_the_delivery_unacked() {
    let orchestrator = Arc::new(volume_orchestrator(FailingBackend, Notifier::default()));

    let subscriber = ScriptedSubscriber::new([vec![Delivery::new(
        "1-0",
        Bytes::from_static(br#"{"category":"VOLUME_CHANGED","level":7,"muted":false}"#),
    )]]);
    let acks = subscriber.acks();
    let consumer = Consumer::new(subscriber, RefreshHandler::new(orchestrator));

    let (stop, shutdown) = watch::channel(false);
    let task = tokio::spawn(consumer.run(shutdown));

    tokio::time::sleep(Duration::from_millis(50)).await;
    stop.send(true).unwrap();
    task.await.unwrap();

    // The cache store was down, so the delivery stays pending for retry.
    assert!(acks.lock().unwrap().is_empty());
}
