//! The duplex client: connection lifetime plus buffered queues.
//!
//! ```text
//!                 ┌──────────────── DuplexClient ────────────────┐
//! read_inbound ◀──│ inbound (100) ◀── decode_loop ◀──┐           │
//!                 │                                  transport   │
//! write_outbound ─│▶ outbound (100) ──▶ encode_loop ─┘           │
//!                 │                                              │
//! recv_exit ◀─────│ exits ◀── one LoopExit per loop run          │
//!                 └──────────────────────────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! Detached ──connect()──▶ Attached ──stop()──▶ Detached
//!     ▲                      │
//!     └──── connect() ◀──────┘ (replaces the live transport)
//! ```
//!
//! `connect` only attaches the transport. Starting the pumps is a
//! separate, explicit step: call [`DuplexClient::run_decode_loop`] and
//! [`DuplexClient::run_encode_loop`] on their own tasks, or use
//! [`DuplexClient::spawn_pumps`].
//!
//! When one loop fails the other keeps running (the connection is
//! half-open) until it fails on its own or the caller calls `stop()`.
//! The queues outlive connections: anything still queued for sending
//! when a connection drops is sent by the next encode loop, unless the
//! caller calls [`DuplexClient::discard_outbound`].

use std::fmt;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use broadside_protocol::Envelope;
use broadside_transport::{Connection, Dialer, Headers, WebSocketDialer};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::{ClientConfig, ClientError, LoopOutcome, Strategy};

/// Which pump a [`LoopExit`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Transport → inbound queue.
    Decode,
    /// Outbound queue → transport.
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => f.write_str("decode"),
            Self::Encode => f.write_str("encode"),
        }
    }
}

/// The terminal report of one loop run.
#[derive(Debug)]
pub struct LoopExit {
    /// The loop that finished.
    pub direction: Direction,
    /// How it finished.
    pub result: Result<LoopOutcome, ClientError>,
}

impl LoopExit {
    /// The error that ended the loop, if any.
    pub fn error(&self) -> Option<&ClientError> {
        self.result.as_ref().err()
    }

    /// Returns `true` if the loop ended because the caller called `stop()`.
    pub fn is_local_close(&self) -> bool {
        self.error().is_some_and(ClientError::is_local_close)
    }
}

impl fmt::Display for LoopExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(outcome) => write!(f, "{} loop finished: {outcome:?}", self.direction),
            Err(e) => write!(f, "{} loop failed: {e}", self.direction),
        }
    }
}

/// A persistent duplex connection with buffered inbound and outbound
/// queues, framed by a pluggable [`Strategy`].
///
/// Meant to be shared as `Arc<DuplexClient<..>>`: every method takes
/// `&self`, and the two pumps run on their own tasks.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use broadside_client::{DuplexClient, GuildChatStrategy};
/// use broadside_protocol::{guild::ChatMessage, Envelope};
/// use broadside_transport::Headers;
///
/// # async fn run() -> Result<(), broadside_client::ClientError> {
/// let client = Arc::new(DuplexClient::new(GuildChatStrategy::new()));
/// client.connect("ws://localhost:8080/ws", &Headers::new()).await?;
/// client.spawn_pumps();
///
/// client
///     .write_outbound(Envelope::wrap_guild(ChatMessage::new("ahoy")))
///     .await?;
/// let history = client.read_inbound().await;
/// # let _ = history;
/// # Ok(())
/// # }
/// ```
pub struct DuplexClient<S: Strategy, D: Dialer = WebSocketDialer> {
    strategy: S,
    dialer: D,
    config: ClientConfig,

    /// The live transport. `None` while detached.
    conn: StdMutex<Option<Arc<D::Connection>>>,

    inbound_tx: mpsc::Sender<Envelope>,
    inbound_rx: Mutex<mpsc::Receiver<Envelope>>,
    outbound_tx: mpsc::Sender<Envelope>,
    outbound_rx: Mutex<mpsc::Receiver<Envelope>>,
    exits_tx: mpsc::Sender<LoopExit>,
    exits_rx: Mutex<mpsc::Receiver<LoopExit>>,
}

impl<S: Strategy> DuplexClient<S> {
    /// Creates a detached WebSocket client with the default config.
    pub fn new(strategy: S) -> Self {
        Self::with_dialer(strategy, WebSocketDialer::new(), ClientConfig::default())
    }
}

impl<S: Strategy, D: Dialer> DuplexClient<S, D> {
    /// Creates a detached client that opens connections with `dialer`.
    ///
    /// Capacities of zero are raised to one.
    pub fn with_dialer(strategy: S, dialer: D, config: ClientConfig) -> Self {
        let (inbound_tx, inbound_rx) =
            mpsc::channel(config.inbound_capacity.max(1));
        let (outbound_tx, outbound_rx) =
            mpsc::channel(config.outbound_capacity.max(1));
        let (exits_tx, exits_rx) = mpsc::channel(config.error_capacity.max(1));

        Self {
            strategy,
            dialer,
            config,
            conn: StdMutex::new(None),
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            outbound_tx,
            outbound_rx: Mutex::new(outbound_rx),
            exits_tx,
            exits_rx: Mutex::new(exits_rx),
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The dialer used to open connections.
    pub fn dialer(&self) -> &D {
        &self.dialer
    }

    /// The configured strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    // -- Connection lifetime --

    /// Opens a transport to `url` and attaches it.
    ///
    /// On failure the client is left as it was and the error is returned
    /// here, never on the exit channel. On success the pumps are NOT
    /// started. If a transport was already attached it is closed and
    /// replaced.
    pub async fn connect(
        &self,
        url: &str,
        headers: &Headers,
    ) -> Result<(), ClientError> {
        let conn = self.dialer.dial(url, headers).await.map_err(|e| {
            tracing::debug!(url, error = %e, "dial failed");
            ClientError::Connect(e)
        })?;
        let id = conn.id();

        let previous = self.slot().replace(Arc::new(conn));
        if let Some(previous) = previous {
            tracing::debug!(
                old = %previous.id(), new = %id, "replacing live connection"
            );
            self.close_quietly(previous.as_ref()).await;
        }

        tracing::info!(%id, url, "connected");
        Ok(())
    }

    /// Detaches and closes the transport.
    ///
    /// Sends a close frame on a best-effort basis; failures and timeouts
    /// are logged and swallowed. Running loops fail with a local-close
    /// error. Calling `stop` on a detached client is a no-op.
    pub async fn stop(&self) {
        let conn = self.slot().take();
        let Some(conn) = conn else {
            return;
        };
        self.close_quietly(conn.as_ref()).await;
        tracing::info!(id = %conn.id(), "disconnected");
    }

    /// Returns `true` while a transport is attached.
    ///
    /// Stays `true` after one loop has failed: only `stop()` detaches.
    pub fn connected(&self) -> bool {
        self.slot().is_some()
    }

    /// Caller-driven retry: `stop()`, wait `reconnect_delay`, `connect()`.
    ///
    /// Makes exactly one attempt. Restarting the pumps afterwards is still
    /// the caller's job.
    pub async fn reconnect(
        &self,
        url: &str,
        headers: &Headers,
    ) -> Result<(), ClientError> {
        self.stop().await;
        tracing::debug!(
            url, delay = ?self.config.reconnect_delay, "reconnecting"
        );
        tokio::time::sleep(self.config.reconnect_delay).await;
        self.connect(url, headers).await
    }

    // -- Pumps --

    /// Runs the strategy's decode loop on the attached transport until it
    /// ends, then publishes one [`LoopExit`].
    pub async fn run_decode_loop(&self) {
        let result = match self.current() {
            Some(conn) => {
                tracing::debug!(id = %conn.id(), "decode loop started");
                self.strategy
                    .decode_loop(&self.inbound_tx, conn.as_ref())
                    .await
            }
            None => Err(ClientError::NotConnected),
        };
        self.publish(Direction::Decode, result).await;
    }

    /// Runs the strategy's encode loop on the attached transport until it
    /// ends, then publishes one [`LoopExit`].
    pub async fn run_encode_loop(&self) {
        let result = match self.current() {
            Some(conn) => {
                // Waits for a previous encode loop to let go of the queue.
                let mut outbound = self.outbound_rx.lock().await;
                tracing::debug!(id = %conn.id(), "encode loop started");
                self.strategy
                    .encode_loop(&mut outbound, conn.as_ref())
                    .await
            }
            None => Err(ClientError::NotConnected),
        };
        self.publish(Direction::Encode, result).await;
    }

    /// Spawns both pumps on the Tokio runtime.
    pub fn spawn_pumps(self: &Arc<Self>) -> (JoinHandle<()>, JoinHandle<()>) {
        let decode = {
            let client = Arc::clone(self);
            tokio::spawn(async move { client.run_decode_loop().await })
        };
        let encode = {
            let client = Arc::clone(self);
            tokio::spawn(async move { client.run_encode_loop().await })
        };
        (decode, encode)
    }

    // -- Queues --

    /// Waits for the oldest unread inbound envelope.
    ///
    /// Returns `None` only if the queue is closed, which cannot happen
    /// while the client is alive.
    pub async fn read_inbound(&self) -> Option<Envelope> {
        self.inbound_rx.lock().await.recv().await
    }

    /// Queues an envelope for sending, waiting while the queue is full.
    pub async fn write_outbound(
        &self,
        envelope: Envelope,
    ) -> Result<(), ClientError> {
        self.outbound_tx
            .send(envelope)
            .await
            .map_err(|_| ClientError::QueueClosed)
    }

    /// A sender for the outbound queue, for callers with several producers.
    pub fn outbound_sender(&self) -> mpsc::Sender<Envelope> {
        self.outbound_tx.clone()
    }

    /// Drops everything still queued for sending and returns how many
    /// envelopes were dropped.
    ///
    /// Waits for a running encode loop to release the queue, so call it
    /// after `stop()`.
    pub async fn discard_outbound(&self) -> usize {
        let mut outbound = self.outbound_rx.lock().await;
        let mut discarded = 0;
        while outbound.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "discarded stale outbound envelopes");
        }
        discarded
    }

    // -- Exit channel --

    /// Waits for the next loop exit.
    pub async fn recv_exit(&self) -> Option<LoopExit> {
        self.exits_rx.lock().await.recv().await
    }

    /// Returns a loop exit if one is already waiting.
    pub fn try_recv_exit(&self) -> Option<LoopExit> {
        self.exits_rx.try_lock().ok()?.try_recv().ok()
    }

    // -- Internals --

    fn slot(&self) -> MutexGuard<'_, Option<Arc<D::Connection>>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self) -> Option<Arc<D::Connection>> {
        self.slot().clone()
    }

    async fn close_quietly(&self, conn: &D::Connection) {
        match tokio::time::timeout(self.config.close_timeout, conn.close())
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(id = %conn.id(), error = %e, "close failed");
            }
            Err(_) => {
                tracing::debug!(id = %conn.id(), "close timed out");
            }
        }
    }

    async fn publish(
        &self,
        direction: Direction,
        result: Result<LoopOutcome, ClientError>,
    ) {
        match &result {
            Ok(outcome) => {
                tracing::debug!(%direction, ?outcome, "loop finished");
            }
            Err(e) if e.is_local_close() => {
                tracing::debug!(%direction, "loop stopped");
            }
            Err(e) => {
                tracing::warn!(%direction, error = %e, "loop failed");
            }
        }
        let _ = self.exits_tx.send(LoopExit { direction, result }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GuildChatStrategy;
    use broadside_transport::MemoryDialer;

    fn memory_client() -> DuplexClient<GuildChatStrategy, MemoryDialer> {
        DuplexClient::with_dialer(
            GuildChatStrategy::new(),
            MemoryDialer::new(),
            ClientConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_new_client_is_detached() {
        let client = memory_client();
        assert!(!client.connected());
        assert!(client.try_recv_exit().is_none());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised() {
        let client = DuplexClient::with_dialer(
            GuildChatStrategy::new(),
            MemoryDialer::new(),
            ClientConfig {
                outbound_capacity: 0,
                ..ClientConfig::default()
            },
        );
        assert_eq!(client.outbound_sender().max_capacity(), 1);
    }

    #[tokio::test]
    async fn test_loop_exit_display() {
        let exit = LoopExit {
            direction: Direction::Encode,
            result: Err(ClientError::NotConnected),
        };
        assert_eq!(exit.to_string(), "encode loop failed: not connected");
        assert!(!exit.is_local_close());
    }
}
