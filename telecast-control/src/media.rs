use std::sync::Arc;

use telecast_backend::Backend;
use telecast_core::{ChangeNotification, VolumeState};
use telecast_device::DeviceClient;
use tokio::sync::broadcast;

use crate::error::ControlError;
use crate::handler::RefreshHandler;
use crate::orchestrator::StateOrchestrator;

/// Media control: cached volume state plus the volume commands.
///
/// Commands go straight to the device — the cache is only refreshed when
/// the TV announces the resulting change on the broker, which keeps a
/// single source of truth for what the volume actually is.
pub struct MediaControlService<B> {
    volume: Arc<StateOrchestrator<VolumeState, B, DeviceClient>>,
    device: DeviceClient,
}

impl<B: Backend> MediaControlService<B> {
    pub fn new(volume: StateOrchestrator<VolumeState, B, DeviceClient>, device: DeviceClient) -> Self {
        MediaControlService {
            volume: Arc::new(volume),
            device,
        }
    }

    /// Current volume, read-through.
    pub async fn volume(&self) -> Result<VolumeState, ControlError> {
        self.volume.get().await
    }

    /// Raises the volume by one step.
    pub async fn volume_up(&self) -> Result<(), ControlError> {
        Ok(self.device.volume_up().await?)
    }

    /// Lowers the volume by one step.
    pub async fn volume_down(&self) -> Result<(), ControlError> {
        Ok(self.device.volume_down().await?)
    }

    /// Sets the volume to an absolute level.
    pub async fn set_volume(&self, level: u8) -> Result<(), ControlError> {
        Ok(self.device.set_volume(level).await?)
    }

    /// Handler for the `volume-change` topic.
    pub fn change_handler(&self) -> RefreshHandler<VolumeState, B, DeviceClient> {
        RefreshHandler::new(self.volume.clone())
    }

    /// In-process stream of volume notifications.
    pub fn notifications(&self) -> broadcast::Receiver<ChangeNotification> {
        self.volume.subscribe()
    }
}
