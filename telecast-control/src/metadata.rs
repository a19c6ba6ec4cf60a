use telecast_core::{ChannelMetadata, ChannelState};
use telecast_device::{DeviceClient, MetadataClient};
use tracing::info;

use crate::error::ControlError;

/// Facade over the channel-metadata web service.
pub struct ChannelMetadataService {
    client: MetadataClient,
}

impl ChannelMetadataService {
    pub fn new(client: MetadataClient) -> Self {
        ChannelMetadataService { client }
    }

    /// Editorial metadata for one channel, by name.
    pub async fn metadata_by_channel_name(
        &self,
        channel_name: impl Into<String>,
    ) -> Result<ChannelMetadata, ControlError> {
        Ok(self.client.metadata_by_channel_name(channel_name).await?)
    }

    /// Bulk-upserts the given channels into the metadata service.
    pub async fn populate(
        &self,
        channels: Vec<ChannelState>,
    ) -> Result<Vec<ChannelState>, ControlError> {
        Ok(self.client.populate(channels).await?)
    }

    /// Reads the tuner's channel listing and upserts it wholesale.
    pub async fn populate_from_device(
        &self,
        device: &DeviceClient,
    ) -> Result<Vec<ChannelState>, ControlError> {
        let listing = device.channel_list().await?;
        info!(
            channels = listing.channel_list.len(),
            "populating metadata service from tuner listing"
        );
        self.populate(listing.channel_list).await
    }
}
