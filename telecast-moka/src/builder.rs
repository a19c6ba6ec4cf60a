//! Builder for configuring [`MokaBackend`].

use std::time::{Duration, Instant};

use bytes::Bytes;
use chrono::Utc;
use moka::Expiry;
use moka::future::Cache;
use telecast_core::{CachedValue, StateKey};

use crate::backend::MokaBackend;

/// Expiration policy that derives per-entry TTL from [`CachedValue::expire`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Expiration;

impl Expiry<StateKey, CachedValue<Bytes>> for Expiration {
    fn expire_after_create(
        &self,
        _key: &StateKey,
        value: &CachedValue<Bytes>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::calculate_ttl(value)
    }

    fn expire_after_update(
        &self,
        _key: &StateKey,
        value: &CachedValue<Bytes>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Always use the NEW value's expiry. Moka's default here returns
        // `duration_until_expiry`, which keeps the OLD expiration time and
        // would expire an overwritten entry prematurely.
        Self::calculate_ttl(value)
    }
}

impl Expiration {
    fn calculate_ttl(value: &CachedValue<Bytes>) -> Option<Duration> {
        value.expire().map(|expiration| {
            let delta = expiration - Utc::now();
            let millis = delta.num_milliseconds();
            if millis <= 0 {
                Duration::ZERO
            } else {
                Duration::from_millis(millis as u64)
            }
        })
    }
}

/// Builder for creating and configuring a [`MokaBackend`].
#[derive(Debug, Clone, Copy)]
pub struct MokaBackendBuilder {
    max_capacity: u64,
}

impl MokaBackendBuilder {
    pub(crate) fn new(max_capacity: u64) -> Self {
        MokaBackendBuilder { max_capacity }
    }

    /// Builds the backend.
    pub fn build(self) -> MokaBackend {
        let cache = Cache::builder()
            .max_capacity(self.max_capacity)
            .expire_after(Expiration)
            .build();
        MokaBackend::from_cache(cache)
    }
}
