//! Request bodies for the control and metadata APIs.

use serde::{Deserialize, Serialize};
use telecast_core::ChannelState;

/// Body of `POST /media/volume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVolumeRequest {
    pub level: u8,
}

/// Body of `POST /tv/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetChannelRequest {
    pub channel_id: String,
}

/// Body of the metadata service's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelMetadataSearchRequest {
    pub channel_name: String,
}

/// Body of the metadata service's bulk-upsert endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PopulateChannelsRequest {
    pub channels: Vec<ChannelState>,
}

/// Response of the metadata service's bulk-upsert endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PopulateChannelsResponse {
    pub channels: Vec<ChannelState>,
}
