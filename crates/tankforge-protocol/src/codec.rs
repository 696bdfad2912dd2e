//! Codec trait and implementations for serializing/deserializing frames.
//!
//! The protocol layer doesn't care HOW frames are serialized — it just
//! needs something that implements the [`Codec`] trait. [`JsonCodec`] is
//! the only implementation the wire format currently uses.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// Encoded output must not contain a raw newline: the transport uses
/// `\n` as the frame delimiter.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses compact JSON (via `serde_json`).
///
/// Compact output never contains a literal newline (newlines inside
/// strings are escaped), so every encoded frame fits on one line.
///
/// ## Example
///
/// ```rust
/// use tankforge_protocol::{Codec, JsonCodec, Response, ResponseKind};
///
/// let codec = JsonCodec;
/// let response = Response::new(ResponseKind::IdAssigned, "1");
///
/// let bytes = codec.encode(&response).unwrap();
/// let decoded: Response = codec.decode(&bytes).unwrap();
/// assert_eq!(response, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
