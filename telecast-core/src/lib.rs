//! Core domain types shared by every telecast crate.
//!
//! The television's state is modelled as a set of immutable snapshot types
//! ([`VolumeState`], [`ChannelState`], [`PowerState`], ...). A snapshot is
//! created either by decoding a response from the TV's control API or by
//! decoding an inbound broker message, and is written into the cache under a
//! fixed, well-known [`StateKey`] — a new snapshot always replaces the old
//! entry wholesale. The cache is a point-in-time projection of the device,
//! never the source of truth.

pub mod event;
pub mod key;
pub mod snapshot;
pub mod value;

pub use event::{ChangeNotification, EventCategory};
pub use key::StateKey;
pub use snapshot::{
    ChannelHistory, ChannelList, ChannelMetadata, ChannelState, ForegroundApp, PowerState,
    StateKind, VolumeState,
};
pub use value::CachedValue;
