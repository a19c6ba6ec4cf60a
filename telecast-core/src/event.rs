//! Change events.
//!
//! The television (and the services around it) announce state changes as
//! JSON messages on per-category broker topics. [`ChangeNotification`] is
//! the wire shape: the category tag sits next to the snapshot fields, so a
//! volume change reads `{"category":"VOLUME_CHANGED","level":55,"muted":true}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::{ChannelHistory, ChannelState, ForegroundApp, PowerState, VolumeState};

/// Category of a device state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "VOLUME_CHANGED")]
    VolumeChanged,
    #[serde(rename = "CHANNEL_CHANGED")]
    ChannelChanged,
    #[serde(rename = "POWER_STATE_CHANGED")]
    PowerStateChanged,
    #[serde(rename = "CHANNEL_HISTORY_CHANGED")]
    ChannelHistoryChanged,
    #[serde(rename = "FOREGROUND_APP_CHANGED")]
    ForegroundAppChanged,
}

impl EventCategory {
    /// All categories, in wire-tag order.
    pub const ALL: [EventCategory; 5] = [
        EventCategory::VolumeChanged,
        EventCategory::ChannelChanged,
        EventCategory::PowerStateChanged,
        EventCategory::ChannelHistoryChanged,
        EventCategory::ForegroundAppChanged,
    ];

    /// The wire tag used in notification payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventCategory::VolumeChanged => "VOLUME_CHANGED",
            EventCategory::ChannelChanged => "CHANNEL_CHANGED",
            EventCategory::PowerStateChanged => "POWER_STATE_CHANGED",
            EventCategory::ChannelHistoryChanged => "CHANNEL_HISTORY_CHANGED",
            EventCategory::ForegroundAppChanged => "FOREGROUND_APP_CHANGED",
        }
    }

    /// Broker topic on which external change events for this category arrive.
    pub const fn change_topic(self) -> &'static str {
        match self {
            EventCategory::VolumeChanged => "volume-change",
            EventCategory::ChannelChanged => "channel-change",
            EventCategory::PowerStateChanged => "power-state-change",
            EventCategory::ChannelHistoryChanged => "channel-history-change",
            EventCategory::ForegroundAppChanged => "foreground-app-change",
        }
    }

    /// Broker topic on which this service re-publishes notifications.
    pub const fn notification_topic(self) -> &'static str {
        match self {
            EventCategory::VolumeChanged => "notification:volume-change",
            EventCategory::ChannelChanged => "notification:channel-change",
            EventCategory::PowerStateChanged => "notification:power-state-change",
            EventCategory::ChannelHistoryChanged => "notification:channel-history-change",
            EventCategory::ForegroundAppChanged => "notification:foreground-app-change",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change notification: category tag plus the matching snapshot.
///
/// The payload fields are inlined next to the tag, so the JSON shape is the
/// same whether the snapshot came from the device API or from the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ChangeNotification {
    #[serde(rename = "VOLUME_CHANGED")]
    VolumeChanged(VolumeState),
    #[serde(rename = "CHANNEL_CHANGED")]
    ChannelChanged(ChannelState),
    #[serde(rename = "POWER_STATE_CHANGED")]
    PowerStateChanged(PowerState),
    #[serde(rename = "CHANNEL_HISTORY_CHANGED")]
    ChannelHistoryChanged(ChannelHistory),
    #[serde(rename = "FOREGROUND_APP_CHANGED")]
    ForegroundAppChanged(ForegroundApp),
}

impl ChangeNotification {
    /// The category this notification carries.
    pub fn category(&self) -> EventCategory {
        match self {
            ChangeNotification::VolumeChanged(_) => EventCategory::VolumeChanged,
            ChangeNotification::ChannelChanged(_) => EventCategory::ChannelChanged,
            ChangeNotification::PowerStateChanged(_) => EventCategory::PowerStateChanged,
            ChangeNotification::ChannelHistoryChanged(_) => EventCategory::ChannelHistoryChanged,
            ChangeNotification::ForegroundAppChanged(_) => EventCategory::ForegroundAppChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_notification_inlines_payload_next_to_tag() {
        let notification = ChangeNotification::VolumeChanged(VolumeState {
            level: 55,
            muted: true,
        });
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category": "VOLUME_CHANGED", "level": 55, "muted": true})
        );
    }

    #[test]
    fn volume_notification_decodes_from_wire_shape() {
        let raw = r#"{"category":"VOLUME_CHANGED","level":55,"muted":true}"#;
        let notification: ChangeNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(notification.category(), EventCategory::VolumeChanged);
        assert_eq!(
            notification,
            ChangeNotification::VolumeChanged(VolumeState {
                level: 55,
                muted: true,
            })
        );
    }

    #[test]
    fn unknown_category_is_a_decode_error() {
        let raw = r#"{"category":"BRIGHTNESS_CHANGED","value":3}"#;
        assert!(serde_json::from_str::<ChangeNotification>(raw).is_err());
    }

    #[test]
    fn topics_are_distinct_per_category() {
        let mut topics: Vec<_> = EventCategory::ALL
            .iter()
            .flat_map(|c| [c.change_topic(), c.notification_topic()])
            .collect();
        topics.sort_unstable();
        topics.dedup();
        assert_eq!(topics.len(), EventCategory::ALL.len() * 2);
    }
}
