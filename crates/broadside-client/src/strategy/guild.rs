//! Guild-chat framing.

use broadside_protocol::guild::{ChatEntry, ChatHistory};
use broadside_protocol::{Codec, Envelope, GuildPacket, JsonCodec};
use broadside_transport::Connection;
use tokio::sync::mpsc;

use super::{deliver, next_outbound, remote_closed, LoopOutcome, Strategy};
use crate::ClientError;

/// Strategy for the guild chat service.
///
/// The first frame of every connection is a [`ChatHistory`] snapshot;
/// every frame after it is one [`ChatEntry`]. Sending a
/// [`Disconnect`](broadside_protocol::guild::Disconnect) ends the encode
/// loop.
#[derive(Debug, Clone, Default)]
pub struct GuildChatStrategy<C: Codec = JsonCodec> {
    codec: C,
}

impl GuildChatStrategy {
    /// Creates a guild-chat strategy using JSON frames.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> GuildChatStrategy<C> {
    /// Creates a guild-chat strategy with a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    fn decode_frame(
        &self,
        frame: &[u8],
        first: bool,
    ) -> Result<GuildPacket, ClientError> {
        let packet = if first {
            self.codec.decode::<ChatHistory>(frame).map(GuildPacket::from)
        } else {
            self.codec.decode::<ChatEntry>(frame).map(GuildPacket::from)
        };
        packet.map_err(ClientError::Decode)
    }
}

impl<C: Codec> Strategy for GuildChatStrategy<C> {
    async fn decode_loop<T: Connection>(
        &self,
        inbound: &mpsc::Sender<Envelope>,
        conn: &T,
    ) -> Result<LoopOutcome, ClientError> {
        // Local to this call, so every new connection starts with history.
        let mut first = true;
        loop {
            let frame =
                conn.recv().await?.ok_or_else(|| remote_closed("guild chat"))?;
            let packet = self.decode_frame(&frame, first)?;
            first = false;

            tracing::trace!(id = %conn.id(), ?packet, "guild packet received");
            deliver(inbound, Envelope::Guild(packet), conn).await?;
        }
    }

    async fn encode_loop<T: Connection>(
        &self,
        outbound: &mut mpsc::Receiver<Envelope>,
        conn: &T,
    ) -> Result<LoopOutcome, ClientError> {
        while let Some(envelope) = next_outbound(outbound, conn).await? {
            let packet = envelope
                .into_guild()
                .map_err(ClientError::ProtocolMismatch)?;
            let frame =
                self.codec.encode(&packet).map_err(ClientError::Encode)?;
            conn.send(&frame).await?;
            tracing::trace!(id = %conn.id(), ?packet, "guild packet sent");

            if packet.is_disconnect() {
                return Ok(LoopOutcome::Disconnected {
                    pending: outbound.len(),
                });
            }
        }
        Ok(LoopOutcome::SourceClosed)
    }
}
