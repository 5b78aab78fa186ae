//! Custom-room matchmaking in the terminal.
//!
//! Commands read from stdin:
//!
//! | Input         | Packet sent                 |
//! |---------------|-----------------------------|
//! | `create`      | create a room               |
//! | `join <room>` | join the room with that id  |
//! | `quit`        | disconnect and exit         |
//! | anything else | player message              |
//!
//! ```text
//! BROADSIDE_URL=ws://localhost:8080 BROADSIDE_TOKEN=... cargo run -p matchmaking
//! ```

use std::sync::Arc;

use broadside::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_URL: &str = "ws://localhost:8080";

fn packet_for(player: &str, line: &str) -> Option<MatchmakingPacket> {
    let packet = match line.split_once(' ') {
        _ if line.is_empty() => return None,
        Some(("join", room)) => MatchmakingPacket::join_room(player, room.trim()),
        _ if line == "create" => MatchmakingPacket::create_room(player),
        _ if line == "quit" => MatchmakingPacket::disconnect(player),
        _ => MatchmakingPacket::player_message(player, line),
    };
    Some(packet)
}

#[tokio::main]
async fn main() -> Result<(), BroadsideError> {
    broadside::init_tracing();

    let base = std::env::var("BROADSIDE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let token = std::env::var("BROADSIDE_TOKEN").unwrap_or_default();
    let player = std::env::var("BROADSIDE_PLAYER")
        .unwrap_or_else(|_| std::process::id().to_string());

    let url = MatchmakingMode::Custom.url(&base);
    let headers = if token.is_empty() {
        Headers::new()
    } else {
        Headers::bearer(&token)
    };

    let client = Arc::new(DuplexClient::new(MatchmakingStrategy::new()));
    tracing::info!(%url, %player, "connecting");
    client.connect(&url, &headers).await?;
    client.spawn_pumps();

    let reader = Arc::clone(&client);
    tokio::spawn(async move {
        while let Some(envelope) = reader.read_inbound().await {
            match envelope.into_matchmaking() {
                Ok(packet) => println!("[{}] {:?}", packet.sender_id, packet.body),
                Err(e) => tracing::warn!(error = %e, "unexpected envelope"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            exit = client.recv_exit() => {
                if let Some(exit) = exit {
                    tracing::info!(%exit, "matchmaking session ended");
                }
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(packet) = packet_for(&player, line.trim()) else {
                    continue;
                };
                client.write_outbound(packet.into()).await?;
            }
        }
    }

    client.stop().await;
    Ok(())
}
