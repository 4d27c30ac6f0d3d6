//! Real-time messaging client for Slack RTM style endpoints.
//!
//! The client keeps one long-lived WebSocket open and runs three concurrent units around it:
//!
//! - **Inbound dispatch**: the connection's read loop answers pings, swallows pongs, and hands
//!   decoded text payloads to the handler registered with [`Client::on_text`]
//! - **Outbound pump**: a task that drains the queue fed by [`Client::send_message`] into the
//!   socket, one message at a time, in enqueue order
//! - **Heartbeat**: a task that writes a PING control frame on a fixed interval, outside the queue
//!
//! [`Client::main_loop`] runs the last two until the connection closes.
//!
//! # Example
//!
//! ```rust, no_run
//! use slack_rtm_client::rtm::Client;
//! use slack_rtm_client::ws::Config;
//!
//! #[tokio::main]
//! async fn main() -> slack_rtm_client::Result<()> {
//!     let client = Client::new("wss://rtm.example.com/websocket", Config::default())?;
//!
//!     client.on_text(|payload| println!("{payload}")).await?;
//!     client.main_loop().await
//! }
//! ```

pub mod client;
mod dispatcher;
mod heartbeat;
mod outbound;
pub mod types;

pub use client::Client;
pub use types::{MessageId, generate_id, stamp};
