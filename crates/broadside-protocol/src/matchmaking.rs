//! Matchmaking packets.
//!
//! Unlike guild chat, every matchmaking frame has the same outer shape:
//! a sender id plus a [`Body`] whose `type` tag says what it is.
//!
//! ```text
//! {"sender_id": "42", "body": {"type": "join_room", "room_id": "r-7"}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The tagged content of a matchmaking packet.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` gives internally
/// tagged JSON: `{"type": "create_room"}`, `{"type": "player_message",
/// "msg": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    /// Either direction: "I'm leaving." The encode loop stops after
    /// sending one.
    Disconnect,

    /// Client → Server: "Open a custom room for me."
    CreateRoom,

    /// Client → Server: "Put me in this room."
    JoinRoom {
        /// The room to join.
        room_id: String,
    },

    /// Either direction: free-form text. The server also uses it to tell
    /// the client which room it was placed in.
    PlayerMessage {
        /// The message text.
        msg: String,
    },
}

impl Body {
    /// Returns the wire tag for this body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Disconnect => "disconnect",
            Self::CreateRoom => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::PlayerMessage { .. } => "player_message",
        }
    }
}

/// One matchmaking frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Id of the player (or server) that produced the packet.
    pub sender_id: String,
    /// What the packet says.
    pub body: Body,
}

impl Packet {
    /// Creates a packet from any displayable sender id.
    ///
    /// Numeric player ids become their decimal string, so
    /// `Packet::new(42, ..)` has `sender_id == "42"`.
    pub fn new(sender: impl fmt::Display, body: Body) -> Self {
        Self {
            sender_id: sender.to_string(),
            body,
        }
    }

    /// A "create room" request.
    pub fn create_room(sender: impl fmt::Display) -> Self {
        Self::new(sender, Body::CreateRoom)
    }

    /// A "join room" request.
    pub fn join_room(
        sender: impl fmt::Display,
        room_id: impl Into<String>,
    ) -> Self {
        Self::new(
            sender,
            Body::JoinRoom {
                room_id: room_id.into(),
            },
        )
    }

    /// A disconnect notice.
    pub fn disconnect(sender: impl fmt::Display) -> Self {
        Self::new(sender, Body::Disconnect)
    }

    /// A free-form player message.
    pub fn player_message(
        sender: impl fmt::Display,
        msg: impl Into<String>,
    ) -> Self {
        Self::new(sender, Body::PlayerMessage { msg: msg.into() })
    }

    /// Returns `true` if the body is [`Body::Disconnect`].
    pub fn is_disconnect(&self) -> bool {
        matches!(self.body, Body::Disconnect)
    }
}
