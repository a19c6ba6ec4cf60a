use telecast_backend::BackendError;
use telecast_core::EventCategory;
use telecast_device::ClientError;
use thiserror::Error;

/// Errors surfaced by the control services.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The device (or another HTTP collaborator) failed; nothing was cached.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The cache store failed an operation that could not be degraded.
    #[error(transparent)]
    Cache(#[from] BackendError),
    /// An inbound change notification did not decode.
    #[error("malformed change notification: {0}")]
    Decode(#[source] serde_json::Error),
    /// A notification of the wrong category reached this state's handler.
    #[error("notification category `{actual}` cannot refresh `{expected}` state")]
    CategoryMismatch {
        expected: EventCategory,
        actual: EventCategory,
    },
    /// The configuration document was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),
}
