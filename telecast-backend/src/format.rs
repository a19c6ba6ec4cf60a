//! Value serialization formats.
//!
//! A [`Format`] is an explicit serializer/deserializer pair chosen at
//! construction time — backends and the [`StateCache`](crate::StateCache)
//! are generic over it, so the choice is static and visible in the type.
//! The store contract is JSON-compatible records, hence [`JsonFormat`] is
//! the default and currently the only implementation.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Statically-dispatched serializer/deserializer pair.
pub trait Format: Clone + Send + Sync {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Bytes, FormatError>;

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, FormatError>;
}

/// JSON format (default).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Bytes, FormatError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| FormatError::Serialize(Box::new(e)))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, FormatError> {
        serde_json::from_slice(data).map_err(|e| FormatError::Deserialize(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecast_core::VolumeState;

    #[test]
    fn json_round_trip() {
        let state = VolumeState {
            level: 30,
            muted: false,
        };
        let raw = JsonFormat.serialize(&state).unwrap();
        let decoded: VolumeState = JsonFormat.deserialize(&raw).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn foreign_bytes_fail_to_deserialize() {
        let result = JsonFormat.deserialize::<VolumeState>(b"not json at all");
        assert!(matches!(result, Err(FormatError::Deserialize(_))));
    }
}
