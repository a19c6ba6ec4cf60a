//! Event plumbing: broker seams, the consumer loop, and in-process fan-out.
//!
//! External change events arrive over a topic-based broker with
//! at-least-once delivery — handlers must tolerate duplicates. The
//! [`Consumer`] loop pulls deliveries, dispatches them to a [`Handler`] and
//! acknowledges explicitly; in-process listeners are reached through the
//! bounded [`Notifier`].

mod broker;
mod consumer;
mod notifier;

pub use broker::{ConsumeError, Delivery, PublishError, Publisher, Subscriber};
pub use consumer::{Consumer, Handler, HandlerError};
pub use notifier::Notifier;
