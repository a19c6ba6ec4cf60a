use std::sync::Arc;

use async_trait::async_trait;
use telecast_core::{ChannelState, ForegroundApp, PowerState, VolumeState};

use crate::client::{ClientError, DeviceClient};

/// Live source of one category of device state.
///
/// The seam between the orchestrator and the device: the orchestrator only
/// knows how to fetch "the current `T`", not which endpoint that is.
#[async_trait]
pub trait StateSource<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, ClientError>;
}

#[async_trait]
impl<T: Send, S: StateSource<T> + ?Sized> StateSource<T> for Arc<S> {
    async fn fetch(&self) -> Result<T, ClientError> {
        (**self).fetch().await
    }
}

#[async_trait]
impl StateSource<VolumeState> for DeviceClient {
    async fn fetch(&self) -> Result<VolumeState, ClientError> {
        self.volume().await
    }
}

#[async_trait]
impl StateSource<ChannelState> for DeviceClient {
    async fn fetch(&self) -> Result<ChannelState, ClientError> {
        self.channel().await
    }
}

#[async_trait]
impl StateSource<PowerState> for DeviceClient {
    async fn fetch(&self) -> Result<PowerState, ClientError> {
        self.power_state().await
    }
}

#[async_trait]
impl StateSource<ForegroundApp> for DeviceClient {
    async fn fetch(&self) -> Result<ForegroundApp, ClientError> {
        self.foreground_app().await
    }
}
