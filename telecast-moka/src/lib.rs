//! In-memory cache backend for telecast using Moka.
//!
//! Useful for single-process deployments and tests. Data is not persisted
//! across restarts and not shared across processes — use the Redis backend
//! for distributed caching. Per-entry expiration is best-effort in Moka's
//! background eviction, but reads check the expiry, so a lapsed entry is
//! never returned.

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::MokaBackendBuilder;
