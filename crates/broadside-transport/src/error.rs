/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the connection failed (bad URL, bad header, refused
    /// handshake, unreachable host).
    #[error("dial {url} failed: {reason}")]
    Dial {
        /// The endpoint that was dialed.
        url: String,
        /// Why the dial failed.
        reason: String,
    },

    /// The remote side closed the connection.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// The connection was closed locally via `close()`.
    #[error("connection closed locally")]
    LocallyClosed,

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}

impl TransportError {
    /// Returns `true` if this error was caused by a local `close()`.
    pub fn is_local_close(&self) -> bool {
        matches!(self, Self::LocallyClosed)
    }
}
