use std::sync::Arc;

use async_trait::async_trait;
use telecast_backend::Backend;
use telecast_core::StateKind;
use telecast_device::StateSource;
use telecast_events::{Handler, HandlerError};

use crate::error::ControlError;
use crate::orchestrator::StateOrchestrator;

/// Bridges one orchestrator's [`apply`](StateOrchestrator::apply) into the
/// consumer loop.
///
/// Decode failures (including wrong-category messages) are poison — they
/// can never succeed on redelivery, so they map to [`HandlerError::Decode`]
/// and get acknowledged and skipped. Anything else maps to
/// [`HandlerError::Apply`] so the delivery is retried.
pub struct RefreshHandler<T, B, S> {
    orchestrator: Arc<StateOrchestrator<T, B, S>>,
}

impl<T, B, S> RefreshHandler<T, B, S> {
    pub fn new(orchestrator: Arc<StateOrchestrator<T, B, S>>) -> Self {
        RefreshHandler { orchestrator }
    }
}

#[async_trait]
impl<T, B, S> Handler for RefreshHandler<T, B, S>
where
    T: StateKind,
    B: Backend,
    S: StateSource<T>,
{
    async fn handle(&self, payload: &[u8]) -> Result<(), HandlerError> {
        match self.orchestrator.apply(payload).await {
            Ok(_) => Ok(()),
            Err(ControlError::Decode(error)) => Err(HandlerError::Decode(Box::new(error))),
            Err(error @ ControlError::CategoryMismatch { .. }) => {
                Err(HandlerError::Decode(Box::new(error)))
            }
            Err(error) => Err(HandlerError::Apply(Box::new(error))),
        }
    }
}
