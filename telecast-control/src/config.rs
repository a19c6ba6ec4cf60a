//! Service configuration.
//!
//! Plain serde structs with sensible defaults; durations use the humantime
//! notation (`"30s"`, `"500ms"`). [`ControlConfig::from_yaml`] parses a
//! whole document, and every section can be omitted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Top-level configuration for the control services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControlConfig {
    pub device: DeviceConfig,
    pub metadata: MetadataConfig,
    pub redis: RedisConfig,
    pub cache: CachePolicyConfig,
    pub events: EventsConfig,
}

impl ControlConfig {
    /// Parses a YAML configuration document.
    pub fn from_yaml(document: &str) -> Result<Self, ControlError> {
        serde_saphyr::from_str(document).map_err(|error| ControlError::Config(error.to_string()))
    }
}

/// Where the television's control API lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub base_url: String,
    /// Transport-level request timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            base_url: "http://127.0.0.1:3000".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Where the channel-metadata web service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Extra attempts after a failed request.
    pub retries: u32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            base_url: "http://127.0.0.1:8082".to_owned(),
            timeout: Duration::from_secs(10),
            retries: 3,
        }
    }
}

/// Redis server used for both the cache and the event streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: "redis://127.0.0.1/".to_owned(),
        }
    }
}

/// How long cached snapshots live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicyConfig {
    /// Time-to-live for written entries (e.g. "30s"); `null` disables expiry.
    #[serde(with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

impl Default for CachePolicyConfig {
    fn default() -> Self {
        CachePolicyConfig {
            ttl: Some(Duration::from_secs(30)),
        }
    }
}

/// Broker subscription settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Consumer group shared by all instances of this service.
    pub group: String,
    /// Consumer name of this instance within the group.
    pub consumer: String,
    /// How long one pull blocks waiting for entries.
    #[serde(with = "humantime_serde")]
    pub block: Duration,
    /// Maximum entries per pull.
    pub count: usize,
    /// Per-category buffer of the in-process notifier.
    pub notifier_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        EventsConfig {
            group: "telecast".to_owned(),
            consumer: "telecast-1".to_owned(),
            block: Duration::from_secs(5),
            count: 16,
            notifier_capacity: 16,
        }
    }
}
