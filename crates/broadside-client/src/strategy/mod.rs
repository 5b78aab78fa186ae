//! Pluggable per-protocol framing.
//!
//! A [`Strategy`] knows how to turn one sub-protocol's frames into
//! [`Envelope`]s and back. The [`DuplexClient`](crate::DuplexClient)
//! owns the connection and the queues; the strategy owns the rules.
//!
//! ```text
//!            decode_loop                      encode_loop
//! transport ────────────▶ inbound queue   outbound queue ────────────▶ transport
//! ```
//!
//! Adding a sub-protocol means adding a type that implements this trait;
//! the client and transport stay untouched.

mod guild;
mod matchmaking;

pub use guild::GuildChatStrategy;
pub use matchmaking::MatchmakingStrategy;

use std::future::Future;

use broadside_protocol::Envelope;
use broadside_transport::{Connection, TransportError};
use tokio::sync::mpsc;

use crate::ClientError;

/// How a loop ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// A disconnect packet was sent. `pending` messages were still queued
    /// behind it and were left in the queue untouched.
    Disconnected {
        /// Number of outbound messages queued after the disconnect.
        pending: usize,
    },
    /// The queue the loop was draining has no senders left.
    ///
    /// Only reachable when calling [`Strategy::encode_loop`] directly:
    /// a [`DuplexClient`](crate::DuplexClient) keeps its own outbound
    /// sender for as long as it lives.
    SourceClosed,
}

/// The decode/encode procedure pair for one sub-protocol.
///
/// Both loops run for the life of a connection and return when it ends.
/// They never retry and never panic: a transport, decode, or unwrap
/// failure ends the loop with that error.
///
/// `decode_loop` is the only reader of `conn` and `encode_loop` the only
/// writer, so the two can run concurrently on separate tasks.
pub trait Strategy: Send + Sync + 'static {
    /// Reads frames from `conn`, decodes them, and pushes the resulting
    /// envelopes into `inbound` in arrival order.
    fn decode_loop<C: Connection>(
        &self,
        inbound: &mpsc::Sender<Envelope>,
        conn: &C,
    ) -> impl Future<Output = Result<LoopOutcome, ClientError>> + Send;

    /// Pulls envelopes from `outbound`, encodes them, and writes them to
    /// `conn` in queue order.
    fn encode_loop<C: Connection>(
        &self,
        outbound: &mut mpsc::Receiver<Envelope>,
        conn: &C,
    ) -> impl Future<Output = Result<LoopOutcome, ClientError>> + Send;
}

/// Waits for the next outbound envelope, or for `conn` to be closed
/// locally, whichever comes first.
///
/// A closed connection wins ties, so a stopped encode loop never takes a
/// message off the queue it can no longer send. Returns `Ok(None)` when
/// every sender is gone.
pub async fn next_outbound<C: Connection>(
    outbound: &mut mpsc::Receiver<Envelope>,
    conn: &C,
) -> Result<Option<Envelope>, ClientError> {
    tokio::select! {
        biased;
        () = conn.closed() => Err(TransportError::LocallyClosed.into()),
        envelope = outbound.recv() => Ok(envelope),
    }
}

/// Pushes one decoded envelope, waiting for room in the queue.
///
/// A local close ends the wait and drops `envelope`, so a stopped decode
/// loop never delivers a frame from its connection after `stop()`.
pub(crate) async fn deliver<C: Connection>(
    inbound: &mpsc::Sender<Envelope>,
    envelope: Envelope,
    conn: &C,
) -> Result<(), ClientError> {
    tokio::select! {
        biased;
        () = conn.closed() => Err(TransportError::LocallyClosed.into()),
        sent = inbound.send(envelope) => sent.map_err(|_| ClientError::QueueClosed),
    }
}

/// Error for a server that hung up cleanly mid-session.
pub(crate) fn remote_closed(protocol: &str) -> ClientError {
    TransportError::ConnectionClosed(format!("{protocol} server closed the connection"))
        .into()
}
