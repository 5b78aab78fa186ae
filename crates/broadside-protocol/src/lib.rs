//! Wire protocol for Broadside.
//!
//! This crate defines the two sub-protocols the game client speaks over
//! persistent connections, and the container that carries them:
//!
//! - **Packets** ([`guild`], [`matchmaking`]): the message structures
//!   that travel on the wire.
//! - **Envelope** ([`Envelope`]): a sum type holding exactly one packet
//!   of either family, so both protocols can share one queue type.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how packets are
//!   converted to/from frame bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the duplex
//! client (queues of envelopes). It doesn't know about connections; it
//! only knows how to serialize, deserialize and wrap packets.
//!
//! ```text
//! Transport (frames) → Protocol (Envelope) → Client queues
//! ```

mod codec;
mod envelope;
mod error;
pub mod guild;
pub mod matchmaking;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use envelope::{Envelope, ProtocolKind};
pub use error::ProtocolError;
pub use guild::Packet as GuildPacket;
pub use matchmaking::Packet as MatchmakingPacket;
