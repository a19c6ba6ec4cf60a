use std::sync::Arc;

use telecast_backend::Backend;
use telecast_core::{ChangeNotification, ChannelList, ChannelState};
use telecast_device::DeviceClient;
use tokio::sync::broadcast;

use crate::error::ControlError;
use crate::handler::RefreshHandler;
use crate::orchestrator::StateOrchestrator;

/// Tuner control: cached current channel, channel listing, tuning.
pub struct ChannelControlService<B> {
    channel: Arc<StateOrchestrator<ChannelState, B, DeviceClient>>,
    device: DeviceClient,
}

impl<B: Backend> ChannelControlService<B> {
    pub fn new(
        channel: StateOrchestrator<ChannelState, B, DeviceClient>,
        device: DeviceClient,
    ) -> Self {
        ChannelControlService {
            channel: Arc::new(channel),
            device,
        }
    }

    /// Currently tuned channel, read-through.
    pub async fn channel(&self) -> Result<ChannelState, ControlError> {
        self.channel.get().await
    }

    /// Full channel listing, straight from the tuner.
    ///
    /// The listing changes only on a rescan, and the TV serves it quickly,
    /// so it is not worth a cache entry.
    pub async fn channel_list(&self) -> Result<ChannelList, ControlError> {
        Ok(self.device.channel_list().await?)
    }

    /// Tunes to the given channel.
    pub async fn set_channel(&self, channel_id: impl Into<String>) -> Result<(), ControlError> {
        Ok(self.device.set_channel(channel_id).await?)
    }

    /// Handler for the `channel-change` topic.
    pub fn change_handler(&self) -> RefreshHandler<ChannelState, B, DeviceClient> {
        RefreshHandler::new(self.channel.clone())
    }

    /// In-process stream of channel notifications.
    pub fn notifications(&self) -> broadcast::Receiver<ChangeNotification> {
        self.channel.subscribe()
    }
}
