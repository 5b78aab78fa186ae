//! Integration tests for the WebSocket dialer and connection.
//!
//! Each test spins up a bare `tokio-tungstenite` server on a random port
//! and drives it from the test body, so the client side is exercised
//! against a real handshake and real frames.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;

    use broadside_transport::{
        Connection, Dialer, Headers, TransportError, WebSocketDialer,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_tungstenite::tungstenite::handshake::server::{
        ErrorResponse, Request, Response,
    };
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its `ws://` URL.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}"))
    }

    async fn accept(listener: &TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn test_dial_send_and_receive() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            ws.send(Message::Text("hello from server".into()))
                .await
                .unwrap();
            let msg = ws.next().await.unwrap().unwrap();
            assert!(msg.is_text(), "UTF-8 payloads go out as text frames");
            assert_eq!(msg.into_data().as_ref(), b"hello from client");

            ws.send(Message::Binary(vec![0xff, 0x00].into()))
                .await
                .unwrap();
            let msg = ws.next().await.unwrap().unwrap();
            assert!(msg.is_binary());
        });

        let conn = WebSocketDialer::new()
            .dial(&url, &Headers::new())
            .await
            .expect("should dial");
        assert!(conn.id().into_inner() > 0);

        let received = conn.recv().await.unwrap().expect("should have data");
        assert_eq!(received, b"hello from server");
        conn.send(b"hello from client").await.unwrap();

        let received = conn.recv().await.unwrap().expect("should have data");
        assert_eq!(received, vec![0xff, 0x00]);
        conn.send(&[0xfe, 0x01]).await.unwrap();

        server.await.expect("server task should finish");
    }

    #[tokio::test]
    async fn test_dial_sends_headers() {
        let (listener, url) = listen().await;
        let (seen_tx, seen_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let callback = |req: &Request, resp: Response| -> Result<
                Response,
                ErrorResponse,
            > {
                let auth = req
                    .headers()
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                let refresh = req
                    .headers()
                    .get("refresh-token")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                let _ = seen_tx.send((auth, refresh));
                Ok(resp)
            };
            let _ws = tokio_tungstenite::accept_hdr_async(stream, callback)
                .await
                .unwrap();
        });

        let mut headers = Headers::bearer("access");
        headers.insert("Refresh-Token", "refresh");
        let _conn = WebSocketDialer::new()
            .dial(&url, &headers)
            .await
            .expect("should dial");

        let (auth, refresh) = seen_rx.await.unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer access"));
        assert_eq!(refresh.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_dial_unreachable_fails() {
        let (listener, url) = listen().await;
        drop(listener);

        let err = WebSocketDialer::new()
            .dial(&url, &Headers::new())
            .await
            .err()
            .expect("dial should fail");
        assert!(matches!(err, TransportError::Dial { .. }));
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_server_close() {
        let (listener, url) = listen().await;
        tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            ws.close(None).await.unwrap();
        });

        let conn = WebSocketDialer::new()
            .dial(&url, &Headers::new())
            .await
            .unwrap();
        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_close_interrupts_reader_and_sends_close_frame() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            // Park until the client says goodbye.
            loop {
                match ws.next().await {
                    Some(Ok(Message::Close(_))) | None => return true,
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => return false,
                }
            }
        });

        let conn = Arc::new(
            WebSocketDialer::new()
                .dial(&url, &Headers::new())
                .await
                .unwrap(),
        );
        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::task::yield_now().await;

        conn.close().await.expect("close should succeed");
        conn.close().await.expect("second close is a no-op");
        assert!(conn.is_closed());

        let err = reader.await.unwrap().unwrap_err();
        assert!(err.is_local_close());
        assert!(conn.send(b"late").await.unwrap_err().is_local_close());
        assert!(server.await.unwrap(), "server should see a close frame");
    }
}
