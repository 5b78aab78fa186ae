//! Drives a full guild-chat session through the meta-crate's prelude.

use std::sync::Arc;
use std::time::Duration;

use broadside::prelude::*;
use broadside::transport::MemoryDialer;

#[tokio::test]
async fn test_guild_session_through_prelude() -> Result<(), BroadsideError> {
    broadside::init_tracing();
    broadside::init_tracing();

    let client = Arc::new(DuplexClient::with_dialer(
        GuildChatStrategy::new(),
        MemoryDialer::new(),
        ClientConfig::default(),
    ));
    let mut peer = client.dialer().accept_next();
    client.connect("mem://guild", &Credentials::default().headers()).await?;
    client.spawn_pumps();

    peer.send(r#"{"type":"history","data":[{"content":"welcome","user_id":3}]}"#);
    let envelope = tokio::time::timeout(Duration::from_secs(2), client.read_inbound())
        .await
        .expect("history should arrive")
        .expect("inbound queue open");
    assert_eq!(envelope.kind(), ProtocolKind::Guild);
    match envelope.into_guild()? {
        GuildPacket::History(history) => assert_eq!(history.data[0].user_id, 3),
        other => panic!("expected history, got {other:?}"),
    }

    client.write_outbound(Envelope::wrap_guild(ChatMessage::new("hi"))).await?;
    client.write_outbound(Envelope::wrap_guild(Disconnect {})).await?;

    let first = peer.recv().await.expect("chat line");
    let value: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(value["content"], "hi");
    assert_eq!(peer.recv().await.expect("disconnect"), b"{}".to_vec());

    let exit = tokio::time::timeout(Duration::from_secs(2), client.recv_exit())
        .await
        .expect("encode loop should finish")
        .expect("exit channel open");
    assert_eq!(exit.direction, Direction::Encode);
    assert_eq!(exit.result?, LoopOutcome::Disconnected { pending: 0 });

    client.stop().await;
    Ok(())
}
