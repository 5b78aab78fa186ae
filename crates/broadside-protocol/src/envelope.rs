//! The uniform container that travels through a duplex client's queues.

use std::fmt;

use crate::{guild, matchmaking, ProtocolError};

/// Which protocol family a packet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolKind {
    /// Guild chat.
    Guild,
    /// Matchmaking.
    Matchmaking,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guild => f.write_str("guild"),
            Self::Matchmaking => f.write_str("matchmaking"),
        }
    }
}

/// One message of either protocol, sent or received over a duplex
/// connection.
///
/// The variant is fixed when the envelope is built, so an envelope made
/// with [`wrap_guild`](Self::wrap_guild) can only be opened as a guild
/// packet. Opening it as the other family returns
/// [`ProtocolError::TypeMismatch`]; it never panics and never coerces.
///
/// ```text
/// Envelope::Guild(guild::Packet)             ← guild chat strategy
/// Envelope::Matchmaking(matchmaking::Packet) ← matchmaking strategy
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// A guild-chat packet.
    Guild(guild::Packet),
    /// A matchmaking packet.
    Matchmaking(matchmaking::Packet),
}

impl Envelope {
    /// Wraps a guild-chat packet.
    pub fn wrap_guild(packet: impl Into<guild::Packet>) -> Self {
        Self::Guild(packet.into())
    }

    /// Wraps a matchmaking packet.
    pub fn wrap_matchmaking(packet: matchmaking::Packet) -> Self {
        Self::Matchmaking(packet)
    }

    /// Returns the protocol family this envelope carries.
    pub fn kind(&self) -> ProtocolKind {
        match self {
            Self::Guild(_) => ProtocolKind::Guild,
            Self::Matchmaking(_) => ProtocolKind::Matchmaking,
        }
    }

    /// Unwraps a guild-chat packet.
    ///
    /// # Errors
    /// Returns [`ProtocolError::TypeMismatch`] if this is a matchmaking
    /// envelope.
    pub fn into_guild(self) -> Result<guild::Packet, ProtocolError> {
        match self {
            Self::Guild(packet) => Ok(packet),
            other => Err(other.mismatch(ProtocolKind::Guild)),
        }
    }

    /// Unwraps a matchmaking packet.
    ///
    /// # Errors
    /// Returns [`ProtocolError::TypeMismatch`] if this is a guild
    /// envelope.
    pub fn into_matchmaking(
        self,
    ) -> Result<matchmaking::Packet, ProtocolError> {
        match self {
            Self::Matchmaking(packet) => Ok(packet),
            other => Err(other.mismatch(ProtocolKind::Matchmaking)),
        }
    }

    /// Borrows the guild-chat packet.
    pub fn as_guild(&self) -> Result<&guild::Packet, ProtocolError> {
        match self {
            Self::Guild(packet) => Ok(packet),
            other => Err(other.mismatch(ProtocolKind::Guild)),
        }
    }

    /// Borrows the matchmaking packet.
    pub fn as_matchmaking(
        &self,
    ) -> Result<&matchmaking::Packet, ProtocolError> {
        match self {
            Self::Matchmaking(packet) => Ok(packet),
            other => Err(other.mismatch(ProtocolKind::Matchmaking)),
        }
    }

    fn mismatch(&self, expected: ProtocolKind) -> ProtocolError {
        ProtocolError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl From<guild::Packet> for Envelope {
    fn from(packet: guild::Packet) -> Self {
        Self::Guild(packet)
    }
}

impl From<matchmaking::Packet> for Envelope {
    fn from(packet: matchmaking::Packet) -> Self {
        Self::Matchmaking(packet)
    }
}
