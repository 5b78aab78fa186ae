//! WebSocket transport implementation using `tokio-tungstenite`.

use std::fmt;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{
    CloseSignal, Connection, ConnectionId, Dialer, Headers, TransportError,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A [`Dialer`] that opens WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketDialer;

impl WebSocketDialer {
    /// Creates a new WebSocket dialer.
    pub fn new() -> Self {
        Self
    }
}

impl Dialer for WebSocketDialer {
    type Connection = WebSocketConnection;

    async fn dial(
        &self,
        url: &str,
        headers: &Headers,
    ) -> Result<Self::Connection, TransportError> {
        let request = build_request(url, headers)?;
        let (ws, response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| dial_error(url, e))?;

        let id = ConnectionId::next();
        tracing::debug!(
            %id, url, status = %response.status(), "dialed WebSocket connection"
        );

        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
            signal: CloseSignal::new(),
        })
    }
}

fn build_request(url: &str, headers: &Headers) -> Result<Request, TransportError> {
    let mut request =
        url.into_client_request().map_err(|e| dial_error(url, e))?;

    for (name, value) in headers.iter() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| dial_error(url, e))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| dial_error(url, e))?;
        request.headers_mut().append(name, value);
    }

    Ok(request)
}

fn dial_error(url: &str, reason: impl fmt::Display) -> TransportError {
    TransportError::Dial {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// A single client-side WebSocket connection.
///
/// The socket is split into halves with separate locks, so the read loop
/// parked in `recv` never holds up a `send`.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
    signal: CloseSignal,
}

impl Connection for WebSocketConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        // JSON codecs produce UTF-8, and servers expect text frames for it.
        let msg = match std::str::from_utf8(data) {
            Ok(text) => Message::Text(text.to_owned().into()),
            Err(_) => Message::Binary(data.to_vec().into()),
        };

        tokio::select! {
            biased;
            () = self.signal.closed() => Err(TransportError::LocallyClosed),
            result = async { self.sink.lock().await.send(msg).await } => {
                result.map_err(|e| {
                    TransportError::SendFailed(std::io::Error::new(
                        std::io::ErrorKind::BrokenPipe,
                        e,
                    ))
                })
            }
        }
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            let msg = tokio::select! {
                biased;
                () = self.signal.closed() => {
                    return Err(TransportError::LocallyClosed);
                }
                msg = stream.next() => msg,
            };
            match msg {
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        if !self.signal.close() {
            return Ok(());
        }
        tracing::debug!(id = %self.id, "closing WebSocket connection");
        self.sink
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    e,
                ))
            })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_attaches_headers() {
        let mut headers = Headers::bearer("tok");
        headers.insert("Refresh-Token", "ref");
        let request =
            build_request("ws://localhost:8080/ws", &headers).unwrap();

        assert_eq!(request.uri().path(), "/ws");
        assert_eq!(request.headers()["authorization"], "Bearer tok");
        assert_eq!(request.headers()["refresh-token"], "ref");
    }

    #[test]
    fn test_build_request_rejects_bad_url() {
        let err = build_request("not a url", &Headers::new()).unwrap_err();
        assert!(matches!(err, TransportError::Dial { .. }));
    }

    #[test]
    fn test_build_request_rejects_bad_header_name() {
        let mut headers = Headers::new();
        headers.insert("bad header", "x");
        let err =
            build_request("ws://localhost:8080", &headers).unwrap_err();
        assert!(err.to_string().contains("ws://localhost:8080"));
    }
}
