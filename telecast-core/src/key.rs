//! Cache key type.
//!
//! Every piece of device state lives under one fixed, well-known key
//! (`media:volume`, `tv:channel`, ...). Keys are plain strings on the wire;
//! [`StateKey`] wraps them in [`SmolStr`] so the usual static keys are
//! cloned without heap allocation.

use std::fmt;

use smol_str::SmolStr;

/// A cache key identifying one category of device state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StateKey(SmolStr);

impl StateKey {
    /// Creates a key from a static string without allocating.
    pub const fn new_static(key: &'static str) -> Self {
        StateKey(SmolStr::new_static(key))
    }

    /// Creates a key from any string-like value.
    pub fn new(key: impl Into<SmolStr>) -> Self {
        StateKey(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for StateKey {
    fn from(key: &str) -> Self {
        StateKey(SmolStr::new(key))
    }
}
