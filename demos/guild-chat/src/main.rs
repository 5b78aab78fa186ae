//! Guild chat in the terminal.
//!
//! Prints every packet from the server as JSON and sends each stdin line
//! as a chat message. `quit` sends a disconnect. When a loop fails the
//! client waits the reconnect delay and dials again.
//!
//! ```text
//! BROADSIDE_URL=ws://localhost:8080 cargo run -p guild-chat
//! ```

use std::sync::Arc;

use broadside::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_URL: &str = "ws://localhost:8080";

type Client = DuplexClient<GuildChatStrategy>;

#[tokio::main]
async fn main() -> Result<(), BroadsideError> {
    broadside::init_tracing();

    let url = std::env::var("BROADSIDE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let headers = Headers::new();

    let client = Arc::new(DuplexClient::new(GuildChatStrategy::new()));
    tracing::info!(%url, "connecting");
    client.connect(&url, &headers).await?;
    client.spawn_pumps();

    tokio::spawn(print_inbound(Arc::clone(&client)));
    tokio::spawn(supervise(Arc::clone(&client), url, headers));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let envelope = match line.trim() {
                    "" => continue,
                    "quit" => Envelope::wrap_guild(Disconnect {}),
                    text => Envelope::wrap_guild(ChatMessage::new(text)),
                };
                client.write_outbound(envelope).await?;
            }
        }
    }

    client.stop().await;
    Ok(())
}

async fn print_inbound(client: Arc<Client>) {
    while let Some(envelope) = client.read_inbound().await {
        match envelope.into_guild() {
            Ok(packet) => match serde_json::to_string(&packet) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(error = %e, "could not print packet"),
            },
            Err(e) => tracing::warn!(error = %e, "unexpected envelope"),
        }
    }
}

/// Reconnects after a loop failure. A disconnect or a local stop ends
/// supervision.
async fn supervise(client: Arc<Client>, url: String, headers: Headers) {
    while let Some(exit) = client.recv_exit().await {
        match &exit.result {
            Ok(outcome) => {
                tracing::info!(?outcome, "chat session ended");
                return;
            }
            Err(e) if e.is_local_close() => return,
            Err(e) => tracing::warn!(error = %e, direction = %exit.direction, "chat loop failed"),
        }

        // Tear the other half down too and wait for its exit, then start over.
        client.stop().await;
        if let Some(other) = client.recv_exit().await {
            tracing::debug!(%other, "other loop stopped");
        }
        match client.reconnect(&url, &headers).await {
            Ok(()) => {
                client.spawn_pumps();
            }
            Err(e) => {
                tracing::error!(error = %e, "reconnect failed");
                return;
            }
        }
    }
}
