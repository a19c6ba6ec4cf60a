use std::sync::Arc;

use telecast_backend::Backend;
use telecast_core::{ChangeNotification, ForegroundApp, PowerState};
use telecast_device::DeviceClient;
use tokio::sync::broadcast;

use crate::error::ControlError;
use crate::handler::RefreshHandler;
use crate::orchestrator::StateOrchestrator;

/// Power state of the television, read-through with event refresh.
pub struct PowerControlService<B> {
    power: Arc<StateOrchestrator<PowerState, B, DeviceClient>>,
}

impl<B: Backend> PowerControlService<B> {
    pub fn new(power: StateOrchestrator<PowerState, B, DeviceClient>) -> Self {
        PowerControlService {
            power: Arc::new(power),
        }
    }

    pub async fn power_state(&self) -> Result<PowerState, ControlError> {
        self.power.get().await
    }

    /// Handler for the `power-state-change` topic.
    pub fn change_handler(&self) -> RefreshHandler<PowerState, B, DeviceClient> {
        RefreshHandler::new(self.power.clone())
    }

    pub fn notifications(&self) -> broadcast::Receiver<ChangeNotification> {
        self.power.subscribe()
    }
}

/// Foreground application, read-through with event refresh.
pub struct ForegroundAppService<B> {
    app: Arc<StateOrchestrator<ForegroundApp, B, DeviceClient>>,
}

impl<B: Backend> ForegroundAppService<B> {
    pub fn new(app: StateOrchestrator<ForegroundApp, B, DeviceClient>) -> Self {
        ForegroundAppService { app: Arc::new(app) }
    }

    pub async fn foreground_app(&self) -> Result<ForegroundApp, ControlError> {
        self.app.get().await
    }

    /// Handler for the `foreground-app-change` topic.
    pub fn change_handler(&self) -> RefreshHandler<ForegroundApp, B, DeviceClient> {
        RefreshHandler::new(self.app.clone())
    }

    pub fn notifications(&self) -> broadcast::Receiver<ChangeNotification> {
        self.app.subscribe()
    }
}
