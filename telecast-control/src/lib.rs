//! Read-through state orchestration for the television control plane.
//!
//! [`StateOrchestrator`] composes a cache backend, a live device source and
//! the notifier into the two flows every state category shares:
//!
//! - **Read-through**: consult the cache; on a miss fetch from the device
//!   and write the result back with a TTL. A failed fetch is propagated and
//!   never cached; an unreachable cache degrades to a miss.
//! - **Event-driven refresh**: decode an inbound change notification, write
//!   the fresh snapshot into the cache and fan it out to in-process
//!   listeners (and, best-effort, back onto the broker). A payload that
//!   fails to decode touches nothing.
//!
//! The concrete services ([`MediaControlService`], [`ChannelControlService`],
//! [`PowerControlService`], [`ForegroundAppService`]) wire the orchestrator
//! for one state category each and add the command pass-throughs.
//!
//! Wiring it together looks like this:
//!
//! ```ignore
//! use telecast_control::{ControlConfig, MediaControlService, StateOrchestrator};
//! use telecast_device::DeviceClient;
//! use telecast_events::{Consumer, Notifier};
//! use telecast_redis::{RedisBackend, RedisStreamBroker, SubscriptionConfig};
//! use telecast_core::EventCategory;
//!
//! let config = ControlConfig::from_yaml(&std::fs::read_to_string("telecast.yaml")?)?;
//! let backend = RedisBackend::builder().server(&config.redis.url).build()?;
//! let broker = RedisStreamBroker::new(&config.redis.url)?;
//! let device = DeviceClient::builder(&config.device.base_url).build()?;
//! let notifier = Notifier::new(config.events.notifier_capacity);
//!
//! let volume = StateOrchestrator::new(backend, device.clone(), notifier.clone())
//!     .with_ttl(config.cache.ttl.unwrap())
//!     .with_publisher(std::sync::Arc::new(broker.clone()));
//! let media = MediaControlService::new(volume, device);
//!
//! let subscriber = broker
//!     .subscribe(SubscriptionConfig::new(
//!         EventCategory::VolumeChanged.change_topic(),
//!         &config.events.group,
//!     ))
//!     .await?;
//! tokio::spawn(Consumer::new(subscriber, media.change_handler()).run(shutdown));
//! ```

mod config;
mod error;
mod handler;
mod media;
mod metadata;
mod orchestrator;
mod system;
mod tv;

pub use config::{
    CachePolicyConfig, ControlConfig, DeviceConfig, EventsConfig, MetadataConfig, RedisConfig,
};
pub use error::ControlError;
pub use handler::RefreshHandler;
pub use media::MediaControlService;
pub use metadata::ChannelMetadataService;
pub use orchestrator::StateOrchestrator;
pub use system::{ForegroundAppService, PowerControlService};
pub use tv::ChannelControlService;
