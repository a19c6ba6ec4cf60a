//! Device state snapshots.
//!
//! Each snapshot is an immutable value decoded from the TV's control API or
//! from an inbound broker message — the shape is identical on both paths.
//! [`StateKind`] ties a snapshot type to its fixed cache key and
//! notification category, which is all the orchestrator needs to generalize
//! the read-through pattern across state categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::{ChangeNotification, EventCategory};
use crate::key::StateKey;

/// A snapshot type with a fixed cache key and notification category.
pub trait StateKind:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Well-known cache key for this state category.
    const KEY: StateKey;
    /// Notification category announced when this state changes.
    const CATEGORY: EventCategory;

    /// Wraps the snapshot in its notification.
    fn into_notification(self) -> ChangeNotification;

    /// Extracts the snapshot if the notification carries this category.
    fn from_notification(notification: ChangeNotification) -> Option<Self>;
}

/// Audio volume of the television.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeState {
    pub level: u8,
    pub muted: bool,
}

impl StateKind for VolumeState {
    const KEY: StateKey = StateKey::new_static("media:volume");
    const CATEGORY: EventCategory = EventCategory::VolumeChanged;

    fn into_notification(self) -> ChangeNotification {
        ChangeNotification::VolumeChanged(self)
    }

    fn from_notification(notification: ChangeNotification) -> Option<Self> {
        match notification {
            ChangeNotification::VolumeChanged(state) => Some(state),
            _ => None,
        }
    }
}

/// The currently tuned channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelState {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_type_name: Option<String>,
}

impl StateKind for ChannelState {
    const KEY: StateKey = StateKey::new_static("tv:channel");
    const CATEGORY: EventCategory = EventCategory::ChannelChanged;

    fn into_notification(self) -> ChangeNotification {
        ChangeNotification::ChannelChanged(self)
    }

    fn from_notification(notification: ChangeNotification) -> Option<Self> {
        match notification {
            ChangeNotification::ChannelChanged(state) => Some(state),
            _ => None,
        }
    }
}

/// The channel listing reported by the tuner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelList {
    #[serde(default)]
    pub channel_list_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_logo_server_url: Option<String>,
    #[serde(default)]
    pub channel_list: Vec<ChannelState>,
}

impl ChannelList {
    /// Builds a listing from bare channels, deriving the count.
    pub fn from_channels(channels: Vec<ChannelState>) -> Self {
        ChannelList {
            channel_list_count: channels.len() as u32,
            channel_logo_server_url: None,
            channel_list: channels,
        }
    }
}

/// Power state of the television.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<String>,
}

impl StateKind for PowerState {
    const KEY: StateKey = StateKey::new_static("system:power");
    const CATEGORY: EventCategory = EventCategory::PowerStateChanged;

    fn into_notification(self) -> ChangeNotification {
        ChangeNotification::PowerStateChanged(self)
    }

    fn from_notification(notification: ChangeNotification) -> Option<Self> {
        match notification {
            ChangeNotification::PowerStateChanged(state) => Some(state),
            _ => None,
        }
    }
}

/// The application currently in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForegroundApp {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
}

impl StateKind for ForegroundApp {
    const KEY: StateKey = StateKey::new_static("system:foreground-app");
    const CATEGORY: EventCategory = EventCategory::ForegroundAppChanged;

    fn into_notification(self) -> ChangeNotification {
        ChangeNotification::ForegroundAppChanged(self)
    }

    fn from_notification(notification: ChangeNotification) -> Option<Self> {
        match notification {
            ChangeNotification::ForegroundAppChanged(state) => Some(state),
            _ => None,
        }
    }
}

/// One watched-channel interval, as announced on the history topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelHistory {
    pub channel_name: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Editorial metadata for a channel, served by the metadata web service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetadata {
    pub channel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_logo_url: Option<String>,
}
