//! Unified error type for applications built on Broadside.

use broadside_client::ClientError;
use broadside_protocol::ProtocolError;
use broadside_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// Applications that only use the `broadside` meta-crate can return this
/// one type; `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BroadsideError {
    /// A transport-level error (dial, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, envelope mismatch).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A duplex-client error (connect, loop failure, queue closed).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Local I/O, such as reading the terminal.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
