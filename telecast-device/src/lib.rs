//! HTTP clients for the television and its sidecar services.
//!
//! [`DeviceClient`] talks to the TV's local control API and decodes its
//! responses into `telecast-core` snapshots. It never retries — retry
//! policy belongs to the caller or to a transport-level policy, and a
//! failed fetch must never look like a fresh one. [`MetadataClient`] is
//! the facade over the channel-metadata web service and does carry a
//! configured bounded retry, because that collaborator is idempotent and
//! remote rather than on the living-room LAN.

mod client;
mod metadata;
mod request;
mod source;

pub use client::{ClientError, DeviceClient, DeviceClientBuilder};
pub use metadata::{MetadataClient, MetadataClientBuilder};
pub use request::{SetChannelRequest, SetVolumeRequest};
pub use source::StateSource;
