//! Integration tests for the guild-chat strategy.
//!
//! The first test runs against a real WebSocket server; the rest script
//! the server side with the in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use broadside_client::{
    ClientConfig, ClientError, Direction, DuplexClient, GuildChatStrategy,
    LoopExit, LoopOutcome,
};
use broadside_protocol::guild::{ChatMessage, Disconnect};
use broadside_protocol::{Envelope, GuildPacket, MatchmakingPacket};
use broadside_transport::{Headers, MemoryDialer};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

type MemoryClient = DuplexClient<GuildChatStrategy, MemoryDialer>;

fn memory_client() -> Arc<MemoryClient> {
    Arc::new(DuplexClient::with_dialer(
        GuildChatStrategy::new(),
        MemoryDialer::new(),
        ClientConfig::default(),
    ))
}

async fn next_exit(client: &MemoryClient) -> LoopExit {
    tokio::time::timeout(Duration::from_secs(2), client.recv_exit())
        .await
        .expect("a loop should exit")
        .expect("exit channel open")
}

async fn next_packet<D>(client: &DuplexClient<GuildChatStrategy, D>) -> GuildPacket
where
    D: broadside_transport::Dialer,
{
    tokio::time::timeout(Duration::from_secs(2), client.read_inbound())
        .await
        .expect("an envelope should arrive")
        .expect("inbound queue open")
        .into_guild()
        .expect("guild envelope")
}

// =========================================================================
// Real WebSocket server
// =========================================================================

#[tokio::test]
async fn test_history_then_live_entry_over_websocket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::Text(r#"{"type":"history","data":[]}"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text(r#"{"content":"hi"}"#.into()))
            .await
            .unwrap();

        // The client's chat line arrives as a JSON text frame.
        let msg = ws.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        let value: serde_json::Value =
            serde_json::from_slice(msg.into_data().as_ref()).unwrap();
        assert_eq!(value, serde_json::json!({"content": "ahoy"}));
    });

    let client = Arc::new(DuplexClient::new(GuildChatStrategy::new()));
    client.connect(&url, &Headers::new()).await.unwrap();
    client.spawn_pumps();

    match next_packet(&client).await {
        GuildPacket::History(history) => assert!(history.data.is_empty()),
        other => panic!("expected history first, got {other:?}"),
    }
    match next_packet(&client).await {
        GuildPacket::Entry(entry) => assert_eq!(entry.content, "hi"),
        other => panic!("expected an entry, got {other:?}"),
    }

    client
        .write_outbound(Envelope::wrap_guild(ChatMessage::new("ahoy")))
        .await
        .unwrap();
    server.await.unwrap();

    client.stop().await;
}

// =========================================================================
// In-memory transport
// =========================================================================

#[tokio::test]
async fn test_history_framing_restarts_on_each_connection() {
    let client = memory_client();

    let peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();
    client.spawn_pumps();
    peer.send(r#"{"type":"history","data":[{"content":"old"}]}"#);
    peer.send(r#"{"content":"live","username":"ada"}"#);

    assert!(matches!(next_packet(&client).await, GuildPacket::History(_)));
    match next_packet(&client).await {
        GuildPacket::Entry(entry) => {
            assert_eq!(entry.content, "live");
            assert_eq!(entry.username, "ada");
        }
        other => panic!("expected an entry, got {other:?}"),
    }

    client.stop().await;
    for _ in 0..2 {
        assert!(next_exit(&client).await.is_local_close());
    }

    let peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();
    client.spawn_pumps();
    peer.send(r#"{"type":"history","data":[{"content":"again"}]}"#);

    match next_packet(&client).await {
        GuildPacket::History(history) => {
            assert_eq!(history.data.len(), 1);
            assert_eq!(history.data[0].content, "again");
        }
        other => panic!("expected history on the new connection, got {other:?}"),
    }
    client.stop().await;
}

#[tokio::test]
async fn test_disconnect_ends_encode_loop_and_leaves_rest_queued() {
    let client = memory_client();
    let mut peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();

    client
        .write_outbound(Envelope::wrap_guild(ChatMessage::new("bye")))
        .await
        .unwrap();
    client.write_outbound(Envelope::wrap_guild(Disconnect {})).await.unwrap();
    client
        .write_outbound(Envelope::wrap_guild(ChatMessage::new("too late")))
        .await
        .unwrap();

    client.run_encode_loop().await;

    let exit = next_exit(&client).await;
    assert_eq!(exit.direction, Direction::Encode);
    assert_eq!(
        exit.result.unwrap(),
        LoopOutcome::Disconnected { pending: 1 }
    );

    assert_eq!(peer.try_recv().unwrap(), br#"{"content":"bye"}"#.to_vec());
    assert_eq!(peer.try_recv().unwrap(), b"{}".to_vec());
    assert!(peer.try_recv().is_none(), "nothing sent after disconnect");
    assert_eq!(client.discard_outbound().await, 1);
}

#[tokio::test]
async fn test_matchmaking_envelope_is_a_protocol_mismatch() {
    let client = memory_client();
    let mut peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();

    client
        .write_outbound(Envelope::wrap_matchmaking(MatchmakingPacket::create_room(
            7,
        )))
        .await
        .unwrap();
    client.run_encode_loop().await;

    let exit = next_exit(&client).await;
    assert_eq!(exit.direction, Direction::Encode);
    assert!(matches!(exit.result, Err(ClientError::ProtocolMismatch(_))));
    assert!(peer.try_recv().is_none());
}

#[tokio::test]
async fn test_malformed_frame_ends_decode_loop() {
    let client = memory_client();
    let peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();

    peer.send("this is not json");
    client.run_decode_loop().await;

    let exit = next_exit(&client).await;
    assert_eq!(exit.direction, Direction::Decode);
    assert!(matches!(exit.result, Err(ClientError::Decode(_))));
    assert!(client.connected(), "a failed loop does not detach");
}

#[tokio::test]
async fn test_server_close_ends_decode_loop() {
    let client = memory_client();
    let peer = client.dialer().accept_next();
    client.connect("mem://guild", &Headers::new()).await.unwrap();

    peer.send(r#"{"type":"history","data":[]}"#);
    peer.close();
    client.run_decode_loop().await;

    assert!(matches!(next_packet(&client).await, GuildPacket::History(_)));
    let exit = next_exit(&client).await;
    assert!(matches!(exit.result, Err(ClientError::Transport(_))));
    assert!(!exit.is_local_close());
}
