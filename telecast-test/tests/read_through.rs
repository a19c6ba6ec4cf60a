//! Behavior tests for the read-through flow.

use std::time::Duration;

use telecast_backend::Backend;
use telecast_control::{ControlError, MediaControlService, StateOrchestrator};
use telecast_core::{CachedValue, StateKind, VolumeState};
use telecast_device::{ClientError, DeviceClient};
use telecast_events::Notifier;
use telecast_test::{CountingSource, FailingBackend, FixedSource, MockBackend};

fn volume(level: u8) -> VolumeState {
    VolumeState {
        level,
        muted: false,
    }
}

/// A device client nothing answers for; fetches fail fast with a
/// transport error, exactly like an unplugged television.
fn dead_device() -> DeviceClient {
    DeviceClient::builder("http://127.0.0.1:1")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap()
}

#[tokio::test]
async fn miss_fetches_once_and_writes_back_once() {
    let backend = MockBackend::new();
    let source = FixedSource::new(volume(30));
    let orchestrator =
        StateOrchestrator::new(backend.clone(), source.clone(), Notifier::default());

    let state = orchestrator.get().await.unwrap();

    assert_eq!(state, volume(30));
    assert_eq!(source.calls(), 1);
    assert_eq!(backend.write_count(), 1);
    assert_eq!(
        backend.raw_entry(&VolumeState::KEY).as_deref(),
        Some(br#"{"level":30,"muted":false}"#.as_slice())
    );
}

#[tokio::test]
async fn hit_makes_zero_device_calls() {
    let backend = MockBackend::new();
    let source = FixedSource::new(volume(30));
    let orchestrator =
        StateOrchestrator::new(backend.clone(), source.clone(), Notifier::default());

    // First call populates the cache, the second must not reach the device.
    assert_eq!(orchestrator.get().await.unwrap(), volume(30));
    assert_eq!(orchestrator.get().await.unwrap(), volume(30));

    assert_eq!(source.calls(), 1);
    assert_eq!(backend.counters.read_hit_count(), 1);
}

#[tokio::test]
async fn expired_entry_triggers_a_fresh_fetch() {
    let backend = MockBackend::new();
    let source = FixedSource::new(volume(30));
    let orchestrator = StateOrchestrator::new(backend.clone(), source.clone(), Notifier::default())
        .with_ttl(Duration::from_millis(100));

    assert_eq!(orchestrator.get().await.unwrap(), volume(30));
    assert_eq!(source.calls(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(orchestrator.get().await.unwrap(), volume(30));
    assert_eq!(source.calls(), 2);
    assert_eq!(backend.write_count(), 2);
}

#[tokio::test]
async fn failed_fetch_never_writes_to_the_cache() {
    let backend = MockBackend::new();
    let source = CountingSource::new(dead_device());
    let orchestrator = StateOrchestrator::<VolumeState, _, _>::new(
        backend.clone(),
        source.clone(),
        Notifier::default(),
    );

    let error = orchestrator.get().await.unwrap_err();

    assert!(matches!(
        error,
        ControlError::Client(ClientError::Unreachable(_))
    ));
    assert_eq!(source.calls(), 1);
    assert_eq!(backend.write_count(), 0);
    assert_eq!(backend.cache_entry_count(), 0);
}

#[tokio::test]
async fn unreachable_cache_degrades_to_a_miss() {
    let source = FixedSource::new(volume(12));
    let orchestrator = StateOrchestrator::new(FailingBackend, source.clone(), Notifier::default());

    // Both the read and the write-back fail, but the caller still gets the
    // freshly fetched state.
    assert_eq!(orchestrator.get().await.unwrap(), volume(12));
    assert_eq!(orchestrator.get().await.unwrap(), volume(12));
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn service_serves_cached_volume_without_touching_the_device() {
    let backend = MockBackend::new();
    let raw = serde_json::to_vec(&volume(25)).unwrap();
    backend
        .write(&VolumeState::KEY, CachedValue::eternal(raw.into()))
        .await
        .unwrap();

    let device = dead_device();
    let media = MediaControlService::new(
        StateOrchestrator::new(backend, device.clone(), Notifier::default()),
        device,
    );

    // The device is unreachable, so this only works if the cache answered.
    assert_eq!(media.volume().await.unwrap(), volume(25));
}

#[tokio::test]
async fn commands_propagate_device_errors() {
    let device = dead_device();
    let media = MediaControlService::new(
        StateOrchestrator::new(MockBackend::new(), device.clone(), Notifier::default()),
        device,
    );

    let error = media.volume_up().await.unwrap_err();
    assert!(matches!(
        error,
        ControlError::Client(ClientError::Unreachable(_))
    ));
}
