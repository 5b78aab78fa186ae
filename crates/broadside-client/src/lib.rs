//! Duplex streaming client for Broadside.
//!
//! One [`DuplexClient`] owns one persistent connection and two bounded
//! queues. A [`Strategy`] plugs in the per-protocol framing rules:
//!
//! - [`GuildChatStrategy`]: history snapshot first, then one chat entry
//!   per frame.
//! - [`MatchmakingStrategy`]: one matchmaking packet per frame.
//!
//! # Architecture
//!
//! ```text
//! caller ⇄ DuplexClient queues ⇄ Strategy loops ⇄ Connection (transport)
//! ```
//!
//! The client never retries on its own. Loop failures arrive on the exit
//! channel ([`DuplexClient::recv_exit`]); deciding whether to
//! [`reconnect`](DuplexClient::reconnect) is up to the caller.

mod auth;
mod client;
mod config;
mod endpoint;
mod error;
mod strategy;

pub use auth::{Credentials, REFRESH_TOKEN_HEADER};
pub use client::{Direction, DuplexClient, LoopExit};
pub use config::{ClientConfig, DEFAULT_QUEUE_CAPACITY};
pub use endpoint::MatchmakingMode;
pub use error::ClientError;
pub use strategy::{
    next_outbound, GuildChatStrategy, LoopOutcome, MatchmakingStrategy, Strategy,
};
