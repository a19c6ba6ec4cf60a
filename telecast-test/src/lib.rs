//! Test doubles for the telecast crates.
//!
//! Every double counts its operations, so tests can assert exact call
//! counts ("zero device calls on a cache hit") instead of guessing from
//! side effects.

mod mock_backend;
mod mock_broker;
mod mock_source;

pub use mock_backend::{BackendCounters, FailingBackend, MockBackend};
pub use mock_broker::{FailingPublisher, RecordingPublisher, ScriptedSubscriber};
pub use mock_source::{CountingSource, FixedSource};
