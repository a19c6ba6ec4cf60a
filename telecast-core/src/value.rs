//! Cached value envelope with expiration metadata.
//!
//! [`CachedValue`] wraps a payload with an optional absolute expiry
//! timestamp. Backends derive their store-native TTL from it on write
//! ([`CachedValue::ttl`]) and reconstruct it on read, so an entry written
//! with a TTL of `d` stops being readable no later than `d` after the
//! write. An entry without an expiry persists until it is overwritten or
//! the store evicts it on its own.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A cached payload with an optional absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue<T> {
    data: T,
    expire: Option<DateTime<Utc>>,
}

impl<T> CachedValue<T> {
    /// Creates a value with the given absolute expiry.
    pub fn new(data: T, expire: Option<DateTime<Utc>>) -> Self {
        CachedValue { data, expire }
    }

    /// Creates a value that expires `ttl` from now.
    pub fn with_ttl(data: T, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        CachedValue {
            data,
            expire: Utc::now().checked_add_signed(ttl),
        }
    }

    /// Creates a value without an expiry.
    pub fn eternal(data: T) -> Self {
        CachedValue { data, expire: None }
    }

    /// Returns a reference to the payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns the absolute expiry, if any.
    #[inline]
    pub fn expire(&self) -> Option<DateTime<Utc>> {
        self.expire
    }

    /// Consumes the envelope and returns the payload.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Maps the payload, keeping the expiry.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CachedValue<U> {
        CachedValue {
            data: f(self.data),
            expire: self.expire,
        }
    }

    /// Remaining time-to-live derived from the expiry.
    ///
    /// Returns `None` when there is no expiry or it already passed.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire.and_then(|expire| {
            let remaining = expire.signed_duration_since(Utc::now());
            remaining.to_std().ok().filter(|d| !d.is_zero())
        })
    }

    /// Whether the expiry has passed.
    pub fn is_expired(&self) -> bool {
        match self.expire {
            Some(expire) => expire <= Utc::now(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_derived_from_expiry() {
        let value = CachedValue::with_ttl(42u8, Duration::from_secs(60));
        let ttl = value.ttl().unwrap();
        assert!(ttl <= Duration::from_secs(60));
        assert!(ttl > Duration::from_secs(58));
        assert!(!value.is_expired());
    }

    #[test]
    fn lapsed_expiry_reports_expired_and_no_ttl() {
        let value = CachedValue::new(42u8, Some(Utc::now() - chrono::Duration::seconds(1)));
        assert!(value.is_expired());
        assert!(value.ttl().is_none());
    }

    #[test]
    fn eternal_value_never_expires() {
        let value = CachedValue::eternal("state");
        assert!(value.ttl().is_none());
        assert!(!value.is_expired());
    }
}
