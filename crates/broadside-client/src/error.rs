//! Error types for the duplex client.

use broadside_protocol::ProtocolError;
use broadside_transport::TransportError;

/// Errors surfaced by [`DuplexClient`](crate::DuplexClient) and its
/// strategies.
///
/// `connect` returns [`Connect`](Self::Connect) directly. Every other
/// variant ends a decode or encode loop and is reported once on the
/// client's exit channel.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The initial dial failed: unreachable host, bad URL, or a
    /// rejected handshake.
    #[error("connect failed: {0}")]
    Connect(#[source] TransportError),

    /// A received frame could not be decoded by the active strategy.
    #[error("decode failed: {0}")]
    Decode(#[source] ProtocolError),

    /// An outgoing packet could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] ProtocolError),

    /// The connection failed during a read or write, or was closed.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// An envelope of the wrong protocol family was queued for sending.
    #[error("protocol mismatch: {0}")]
    ProtocolMismatch(#[source] ProtocolError),

    /// A loop was started while no transport was attached.
    #[error("not connected")]
    NotConnected,

    /// A queue's other end is gone.
    #[error("queue closed")]
    QueueClosed,
}

impl ClientError {
    /// Returns `true` if the loop ended because the caller called
    /// `stop()`, rather than because something broke.
    pub fn is_local_close(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_local_close())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: ClientError =
            TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(err.to_string().contains("gone"));
        assert!(!err.is_local_close());
    }

    #[test]
    fn test_local_close_is_detected() {
        let err: ClientError = TransportError::LocallyClosed.into();
        assert!(err.is_local_close());
        assert!(!ClientError::NotConnected.is_local_close());
    }

    #[test]
    fn test_protocol_mismatch_message() {
        let err = ClientError::ProtocolMismatch(ProtocolError::TypeMismatch {
            expected: broadside_protocol::ProtocolKind::Guild,
            found: broadside_protocol::ProtocolKind::Matchmaking,
        });
        assert_eq!(
            err.to_string(),
            "protocol mismatch: type mismatch: expected guild packet, \
             found matchmaking"
        );
    }
}
