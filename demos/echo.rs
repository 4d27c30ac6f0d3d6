//! Echo bot: replies to every `message` event with the same text in the same channel.
//!
//! The endpoint is the `url` returned by `rtm.connect`, passed through the environment:
//! ```sh
//! RTM_ENDPOINT=wss://... RUST_LOG=info cargo run --example echo
//! ```

use std::env;

use serde_json::json;
use slack_rtm_client::rtm::Client;
use slack_rtm_client::ws::Config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint = env::var("RTM_ENDPOINT")?;
    let client = Client::new(&endpoint, Config::default())?;

    let replies = client.clone();
    client
        .on_text(move |payload| {
            // Skip our own echoes
            if payload["type"] != "message" || payload.get("bot_id").is_some() {
                return;
            }

            info!(channel = %payload["channel"], text = %payload["text"], "Echoing message");
            match replies.send_message(&json!({
                "type": "message",
                "channel": payload["channel"],
                "text": payload["text"],
            })) {
                Ok(id) => info!(id, "Reply enqueued"),
                Err(e) => warn!(error = %e, "Unable to enqueue reply"),
            }
        })
        .await?;

    info!(%endpoint, "Connected, entering main loop");
    match client.main_loop().await {
        Err(e) if e.is_connection_closed() => {
            info!("Server closed the connection");
            Ok(())
        }
        result => Ok(result?),
    }
}
