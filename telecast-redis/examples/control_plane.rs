//! Full control-plane wiring against a local Redis and television.
//!
//! Expects a Redis server on localhost and a TV control API at the default
//! base URL (override via a config document in real deployments). Spawns
//! one consumer per change topic, syncs the tuner listing into the
//! metadata service, then prints volume notifications as they arrive.

use std::sync::Arc;

use telecast_control::{
    ChannelControlService, ChannelMetadataService, ControlConfig, ForegroundAppService,
    MediaControlService, PowerControlService, StateOrchestrator,
};
use telecast_core::EventCategory;
use telecast_device::{DeviceClient, MetadataClient};
use telecast_events::{Consumer, Notifier};
use telecast_redis::{RedisBackend, RedisStreamBroker, SubscriptionConfig};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("telecast=debug")
        .init();

    let config = ControlConfig::default();

    let backend = RedisBackend::builder()
        .server(config.redis.url.as_str())
        .build()?;
    let broker = Arc::new(RedisStreamBroker::new(config.redis.url.as_str())?);
    let device = DeviceClient::builder(config.device.base_url.as_str())
        .timeout(config.device.timeout)
        .build()?;
    let metadata_client = MetadataClient::builder(config.metadata.base_url.as_str())
        .timeout(config.metadata.timeout)
        .retries(config.metadata.retries)
        .build()?;
    let notifier = Notifier::new(config.events.notifier_capacity);
    let ttl = config.cache.ttl.expect("default config carries a ttl");

    let media = MediaControlService::new(
        StateOrchestrator::new(backend.clone(), device.clone(), notifier.clone())
            .with_ttl(ttl)
            .with_publisher(broker.clone()),
        device.clone(),
    );
    let tv = ChannelControlService::new(
        StateOrchestrator::new(backend.clone(), device.clone(), notifier.clone())
            .with_ttl(ttl)
            .with_publisher(broker.clone()),
        device.clone(),
    );
    let power = PowerControlService::new(
        StateOrchestrator::new(backend.clone(), device.clone(), notifier.clone()).with_ttl(ttl),
    );
    let apps = ForegroundAppService::new(
        StateOrchestrator::new(backend.clone(), device.clone(), notifier.clone()).with_ttl(ttl),
    );
    let metadata = ChannelMetadataService::new(metadata_client);

    let subscription = |category: EventCategory| {
        SubscriptionConfig::new(category.change_topic(), config.events.group.as_str())
            .consumer(config.events.consumer.as_str())
    };
    let (_stop, shutdown) = watch::channel(false);

    let volume_sub = broker
        .subscribe(subscription(EventCategory::VolumeChanged))
        .await?;
    tokio::spawn(Consumer::new(volume_sub, media.change_handler()).run(shutdown.clone()));

    let channel_sub = broker
        .subscribe(subscription(EventCategory::ChannelChanged))
        .await?;
    tokio::spawn(Consumer::new(channel_sub, tv.change_handler()).run(shutdown.clone()));

    let power_sub = broker
        .subscribe(subscription(EventCategory::PowerStateChanged))
        .await?;
    tokio::spawn(Consumer::new(power_sub, power.change_handler()).run(shutdown.clone()));

    let app_sub = broker
        .subscribe(subscription(EventCategory::ForegroundAppChanged))
        .await?;
    tokio::spawn(Consumer::new(app_sub, apps.change_handler()).run(shutdown.clone()));

    // One-shot sync of the tuner listing into the metadata service.
    match metadata.populate_from_device(&device).await {
        Ok(channels) => println!("metadata service now knows {} channels", channels.len()),
        Err(error) => println!("metadata sync skipped: {error}"),
    }

    let volume = media.volume().await?;
    println!("current volume: {} (muted: {})", volume.level, volume.muted);

    let mut notifications = media.notifications();
    while let Ok(notification) = notifications.recv().await {
        println!("change: {notification:?}");
    }
    Ok(())
}
