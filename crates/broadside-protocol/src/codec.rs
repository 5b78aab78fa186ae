//! Codec trait and implementations for serializing/deserializing packets.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw frame
//! bytes. Strategies don't care HOW packets are serialized, they just
//! need something that implements the [`Codec`] trait. The only
//! requirement is round-trip fidelity: `decode(encode(x)) == x`.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because a codec lives inside a strategy that
/// is shared by the decode and encode loops, which run as separate Tokio
/// tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes one frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Both backend services speak JSON, so this is the default codec for
/// every strategy. It is behind the `json` feature flag (enabled by
/// default).
///
/// ## Example
///
/// ```rust
/// use broadside_protocol::{Codec, JsonCodec, MatchmakingPacket};
///
/// let codec = JsonCodec;
/// let packet = MatchmakingPacket::join_room(42, "room-7");
///
/// let bytes = codec.encode(&packet).unwrap();
/// let decoded: MatchmakingPacket = codec.decode(&bytes).unwrap();
/// assert_eq!(packet, decoded);
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
