//! # Broadside
//!
//! Streaming client for a multiplayer game's backend services.
//!
//! Broadside keeps one persistent WebSocket per service and exposes it as
//! a pair of bounded queues. The framing rules of each service live in a
//! [`Strategy`](broadside_client::Strategy):
//!
//! - **Guild chat**: a history snapshot, then one chat entry per frame.
//! - **Matchmaking**: tagged packets in both directions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use broadside::prelude::*;
//!
//! # async fn run() -> Result<(), BroadsideError> {
//! broadside::init_tracing();
//!
//! let client = Arc::new(DuplexClient::new(MatchmakingStrategy::new()));
//! let url = MatchmakingMode::Custom.url("ws://localhost:8080");
//! client.connect(&url, &Credentials::new("token", "refresh").headers()).await?;
//! client.spawn_pumps();
//!
//! client.write_outbound(MatchmakingPacket::create_room(42).into()).await?;
//! while let Some(envelope) = client.read_inbound().await {
//!     println!("{:?}", envelope.into_matchmaking()?);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use broadside_client as client;
pub use broadside_protocol as protocol;
pub use broadside_transport as transport;
pub use error::BroadsideError;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_LOG_FILTER`]. Calling it twice is harmless: the
/// second call leaves the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}

/// Everything an application usually needs, in one import.
pub mod prelude {
    pub use crate::BroadsideError;
    pub use broadside_client::{
        ClientConfig, ClientError, Credentials, Direction, DuplexClient,
        GuildChatStrategy, LoopExit, LoopOutcome, MatchmakingMode,
        MatchmakingStrategy, Strategy,
    };
    pub use broadside_protocol::guild::{ChatEntry, ChatHistory, ChatMessage, Disconnect};
    pub use broadside_protocol::matchmaking::Body;
    pub use broadside_protocol::{
        Envelope, GuildPacket, MatchmakingPacket, ProtocolError, ProtocolKind,
    };
    pub use broadside_transport::{Headers, TransportError};
}
