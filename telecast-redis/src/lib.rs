//! Redis integration for telecast.
//!
//! Two halves, one server: [`RedisBackend`] stores cached device state as
//! plain string keys with a `PX` expiry, and [`RedisStreamBroker`] carries
//! change events over Redis Streams — `XADD` on the publish side, an
//! `XREADGROUP`/`XACK` consumer group on the subscribe side, which is what
//! gives the consumer loop its at-least-once semantics.

pub mod backend;
pub mod broker;
pub mod error;

pub use backend::{RedisBackend, RedisBackendBuilder};
pub use broker::{RedisStreamBroker, RedisStreamSubscriber, SubscriptionConfig};
pub use error::Error;
