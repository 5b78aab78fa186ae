//! Matchmaking framing.

use broadside_protocol::{Codec, Envelope, JsonCodec, MatchmakingPacket};
use broadside_transport::Connection;
use tokio::sync::mpsc;

use super::{deliver, next_outbound, remote_closed, LoopOutcome, Strategy};
use crate::ClientError;

/// Strategy for the matchmaking service.
///
/// Every frame, in both directions, is a [`MatchmakingPacket`]; the body's
/// own `type` tag says what it is. Sending a packet whose body is
/// [`Body::Disconnect`](broadside_protocol::matchmaking::Body::Disconnect)
/// ends the encode loop.
#[derive(Debug, Clone, Default)]
pub struct MatchmakingStrategy<C: Codec = JsonCodec> {
    codec: C,
}

impl MatchmakingStrategy {
    /// Creates a matchmaking strategy using JSON frames.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> MatchmakingStrategy<C> {
    /// Creates a matchmaking strategy with a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }
}

impl<C: Codec> Strategy for MatchmakingStrategy<C> {
    async fn decode_loop<T: Connection>(
        &self,
        inbound: &mpsc::Sender<Envelope>,
        conn: &T,
    ) -> Result<LoopOutcome, ClientError> {
        loop {
            let frame = conn
                .recv()
                .await?
                .ok_or_else(|| remote_closed("matchmaking"))?;
            let packet: MatchmakingPacket =
                self.codec.decode(&frame).map_err(ClientError::Decode)?;

            tracing::trace!(
                id = %conn.id(),
                sender = %packet.sender_id,
                kind = packet.body.kind(),
                "matchmaking packet received"
            );
            deliver(inbound, Envelope::Matchmaking(packet), conn).await?;
        }
    }

    async fn encode_loop<T: Connection>(
        &self,
        outbound: &mut mpsc::Receiver<Envelope>,
        conn: &T,
    ) -> Result<LoopOutcome, ClientError> {
        while let Some(envelope) = next_outbound(outbound, conn).await? {
            let packet = envelope
                .into_matchmaking()
                .map_err(ClientError::ProtocolMismatch)?;
            let frame =
                self.codec.encode(&packet).map_err(ClientError::Encode)?;
            conn.send(&frame).await?;
            tracing::trace!(
                id = %conn.id(),
                kind = packet.body.kind(),
                "matchmaking packet sent"
            );

            if packet.is_disconnect() {
                return Ok(LoopOutcome::Disconnected {
                    pending: outbound.len(),
                });
            }
        }
        Ok(LoopOutcome::SourceClosed)
    }
}
