//! In-process transport backed by Tokio channels.
//!
//! [`pair`] returns the client half ([`MemoryConnection`]) and a scripted
//! server half ([`MemoryPeer`]). The peer can push frames, break the read
//! side, close cleanly, and inspect every frame the client wrote.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{mpsc, Mutex};

use crate::{
    CloseSignal, Connection, ConnectionId, Dialer, Headers, TransportError,
};

/// What the peer can hand to the client's read side.
#[derive(Debug)]
enum Inbound {
    Frame(Vec<u8>),
    Fail(String),
    Close,
}

/// Creates a connected client/peer pair.
pub fn pair() -> (MemoryConnection, MemoryPeer) {
    let (to_client, incoming) = mpsc::unbounded_channel();
    let (outgoing, from_client) = mpsc::unbounded_channel();
    let signal = Arc::new(CloseSignal::new());

    let conn = MemoryConnection {
        id: ConnectionId::next(),
        incoming: Mutex::new(incoming),
        outgoing,
        signal: Arc::clone(&signal),
    };
    let peer = MemoryPeer {
        to_client,
        from_client,
        signal,
    };
    (conn, peer)
}

/// Client half of an in-memory connection.
pub struct MemoryConnection {
    id: ConnectionId,
    incoming: Mutex<mpsc::UnboundedReceiver<Inbound>>,
    outgoing: mpsc::UnboundedSender<Vec<u8>>,
    signal: Arc<CloseSignal>,
}

impl Connection for MemoryConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        if self.signal.is_closed() {
            return Err(TransportError::LocallyClosed);
        }
        self.outgoing.send(data.to_vec()).map_err(|_| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "peer dropped",
            ))
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut incoming = self.incoming.lock().await;
        let next = tokio::select! {
            biased;
            () = self.signal.closed() => {
                return Err(TransportError::LocallyClosed);
            }
            next = incoming.recv() => next,
        };
        match next {
            Some(Inbound::Frame(data)) => Ok(Some(data)),
            Some(Inbound::Fail(reason)) => Err(TransportError::ReceiveFailed(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, reason),
            )),
            Some(Inbound::Close) | None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.signal.close();
        Ok(())
    }

    async fn closed(&self) {
        self.signal.closed().await;
    }

    fn is_closed(&self) -> bool {
        self.signal.is_closed()
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Scripted server half of an in-memory connection.
pub struct MemoryPeer {
    to_client: mpsc::UnboundedSender<Inbound>,
    from_client: mpsc::UnboundedReceiver<Vec<u8>>,
    signal: Arc<CloseSignal>,
}

impl MemoryPeer {
    /// Queues a frame for the client to read.
    pub fn send(&self, data: impl Into<Vec<u8>>) {
        let _ = self.to_client.send(Inbound::Frame(data.into()));
    }

    /// Makes the client's next read fail with a connection reset.
    pub fn fail(&self, reason: impl Into<String>) {
        let _ = self.to_client.send(Inbound::Fail(reason.into()));
    }

    /// Closes the connection from the server side.
    pub fn close(&self) {
        let _ = self.to_client.send(Inbound::Close);
    }

    /// Waits for the next frame written by the client.
    ///
    /// Returns `None` once the client half is dropped.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.recv().await
    }

    /// Returns the next frame written by the client, if one is buffered.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.try_recv().ok()
    }

    /// Returns `true` once the client has closed its half.
    pub fn client_closed(&self) -> bool {
        self.signal.is_closed()
    }
}

/// A [`Dialer`] that hands out pre-built in-memory connections in order.
///
/// Every dial is recorded, so tests can assert on the URL and headers the
/// client used.
#[derive(Default)]
pub struct MemoryDialer {
    pending: StdMutex<VecDeque<MemoryConnection>>,
    dials: StdMutex<Vec<(String, Headers)>>,
}

impl MemoryDialer {
    /// Creates a dialer with no connections queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a fresh connection and returns its server half.
    pub fn accept_next(&self) -> MemoryPeer {
        let (conn, peer) = pair();
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(conn);
        peer
    }

    /// Every `(url, headers)` dialed so far, oldest first.
    pub fn dials(&self) -> Vec<(String, Headers)> {
        self.dials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dialer for MemoryDialer {
    type Connection = MemoryConnection;

    async fn dial(
        &self,
        url: &str,
        headers: &Headers,
    ) -> Result<Self::Connection, TransportError> {
        self.dials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), headers.clone()));

        let conn = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        conn.ok_or_else(|| TransportError::Dial {
            url: url.to_string(),
            reason: "connection refused".into(),
        })
    }
}
