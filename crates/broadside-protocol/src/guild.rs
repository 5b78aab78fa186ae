//! Guild-chat packets.
//!
//! The guild chat service speaks plain JSON objects with no type tag.
//! Which struct a frame decodes into depends on its position in the
//! stream: the first frame is a [`ChatHistory`], every later frame is a
//! single [`ChatEntry`]. Outgoing frames are [`ChatMessage`]s, and a
//! [`Disconnect`] ends the session.

use serde::{Deserialize, Serialize};

/// The `type` value the server puts on a history snapshot.
pub const HISTORY_TYPE: &str = "history";

/// Client → Server: a line typed into the chat.
///
/// Wire shape: `{"content": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The text of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a chat message with the given text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Server → Client: one stored or live chat message.
///
/// Every field is optional on the wire and falls back to its default,
/// so `{"content": "hi"}` is a valid entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatEntry {
    /// Storage id assigned by the chat service.
    #[serde(rename = "_id")]
    pub id: String,
    /// Guild the message was posted in.
    pub guild_id: i64,
    /// Author's user id.
    pub user_id: i64,
    /// Message text.
    pub content: String,
    /// Server timestamp, passed through as the string the server sent.
    pub timestamp: String,
    /// Author's display name.
    pub username: String,
}

/// Server → Client: the snapshot sent as the first frame of a session.
///
/// Wire shape: `{"type": "history", "data": [<entry>, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatHistory {
    /// Always [`HISTORY_TYPE`] from a well-behaved server. Not validated.
    #[serde(rename = "type")]
    pub kind: String,
    /// Past messages, oldest first.
    pub data: Vec<ChatEntry>,
}

impl ChatHistory {
    /// Creates a history snapshot holding `entries`.
    pub fn new(entries: Vec<ChatEntry>) -> Self {
        Self {
            kind: HISTORY_TYPE.to_string(),
            data: entries,
        }
    }
}

/// Client → Server: end the session.
///
/// Serialized as an empty object `{}`. The encode loop stops right after
/// sending it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnect {}

/// Any guild-chat packet, in either direction.
///
/// `#[serde(untagged)]` means each variant serializes as its inner struct
/// with no wrapper, which is what the chat service expects. There is no
/// `Deserialize` impl: the stream position, not the bytes, decides the
/// variant (see the module docs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Packet {
    /// An outgoing chat line.
    Message(ChatMessage),
    /// The initial history snapshot.
    History(ChatHistory),
    /// A single incoming chat message.
    Entry(ChatEntry),
    /// The disconnect control message.
    Disconnect(Disconnect),
}

impl Packet {
    /// Returns `true` for the disconnect control message.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnect(_))
    }
}

impl From<ChatMessage> for Packet {
    fn from(msg: ChatMessage) -> Self {
        Self::Message(msg)
    }
}

impl From<ChatHistory> for Packet {
    fn from(history: ChatHistory) -> Self {
        Self::History(history)
    }
}

impl From<ChatEntry> for Packet {
    fn from(entry: ChatEntry) -> Self {
        Self::Entry(entry)
    }
}

impl From<Disconnect> for Packet {
    fn from(disconnect: Disconnect) -> Self {
        Self::Disconnect(disconnect)
    }
}
