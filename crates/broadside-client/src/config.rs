//! Client configuration.

use std::time::Duration;

/// Default bound of the inbound and outbound queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Configuration for a [`DuplexClient`](crate::DuplexClient).
///
/// `ClientConfig::default()` matches the game client's behavior; override
/// only the fields you care about.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound of the inbound (server → caller) queue. When it is full the
    /// decode loop stops reading until the caller catches up.
    pub inbound_capacity: usize,

    /// Bound of the outbound (caller → server) queue. When it is full
    /// `write_outbound` waits; messages are never dropped.
    pub outbound_capacity: usize,

    /// Bound of the loop-exit channel. Each loop run publishes exactly one
    /// exit, so 2 lets both loops finish without waiting on the caller.
    pub error_capacity: usize,

    /// How long [`reconnect`](crate::DuplexClient::reconnect) waits
    /// between tearing down and dialing again.
    pub reconnect_delay: Duration,

    /// Upper bound on the best-effort close handshake in `stop()`.
    pub close_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: DEFAULT_QUEUE_CAPACITY,
            outbound_capacity: DEFAULT_QUEUE_CAPACITY,
            error_capacity: 2,
            reconnect_delay: Duration::from_secs(5),
            close_timeout: Duration::from_secs(1),
        }
    }
}
