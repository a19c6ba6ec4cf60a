//! Cache backend trait and serialization formats.
//!
//! A [`Backend`] is a raw byte-oriented key/value store with per-entry TTL;
//! [`StateCache`] layers a statically-chosen [`Format`](format::Format) on
//! top of it to read and write typed snapshots. If you want to implement
//! your own backend, you are in the right place.

mod backend;
mod cache;
pub mod format;

pub use backend::{Backend, BackendResult};
pub use cache::StateCache;
use format::FormatError;
use thiserror::Error;

/// General groups of errors in backend interaction.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not bounded with network interaction.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// Network interaction error: the store is unreachable or timed out.
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send + Sync>),
    /// Serializing\Deserializing data error.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl BackendError {
    /// Whether this error means the store could not be reached.
    ///
    /// Callers that treat an unavailable cache as a miss branch on this.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Connection(_))
    }
}

/// Status of a delete operation.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
