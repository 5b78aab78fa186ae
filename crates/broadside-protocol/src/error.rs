//! Error types for the protocol layer.
//!
//! Each crate in Broadside defines its own error enum. A `ProtocolError`
//! always means the problem is in turning packets into bytes (or back),
//! or in asking an [`Envelope`](crate::Envelope) for the wrong protocol.

use crate::ProtocolKind;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a packet into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a packet).
    ///
    /// Common causes: malformed JSON, wrong data types, or a frame that
    /// belongs to a different protocol.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// An envelope was unwrapped as the wrong protocol family.
    ///
    /// This is always a caller bug: the envelope was built with one
    /// `wrap_*` constructor and opened with the other `into_*`/`as_*`.
    #[error("type mismatch: expected {expected} packet, found {found}")]
    TypeMismatch {
        /// The family the caller asked for.
        expected: ProtocolKind,
        /// The family the envelope actually carries.
        found: ProtocolKind,
    },
}
