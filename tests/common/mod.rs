#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]
#![allow(
    dead_code,
    reason = "Not every test binary uses every helper"
)]

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::mpsc as channel;
use futures::sink::SinkMapErr;
use futures::{SinkExt as _, StreamExt as _};
use serde_json::Value;
use slack_rtm_client::Result;
use slack_rtm_client::error::Error;
use slack_rtm_client::rtm::Client;
use slack_rtm_client::ws::{Config, Frame, Transport};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite;
use url::Url;

pub const ENDPOINT: &str = "wss://rtm.example.com/websocket";

/// Window in which a frame that should never arrive is waited for.
pub const QUIET: Duration = Duration::from_secs(1);

pub fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Remote end of one in-memory connection.
pub struct MockPeer {
    /// Frames the client wrote, in write order
    pub written: channel::UnboundedReceiver<Frame>,
    /// Frames (or faults) to feed the client's read loop
    pub inbound: channel::UnboundedSender<Result<Frame>>,
}

impl MockPeer {
    /// Deliver one frame to the client.
    pub fn push(&self, frame: Frame) {
        self.inbound.unbounded_send(Ok(frame)).unwrap();
    }

    /// Deliver one transport fault to the client.
    pub fn fail(&self, error: Error) {
        self.inbound.unbounded_send(Err(error)).unwrap();
    }

    /// Next frame the client wrote, if one arrives in time.
    pub async fn next_written(&mut self, within: Duration) -> Option<Frame> {
        timeout(within, self.written.next()).await.ok().flatten()
    }

    /// Next written frame, decoded as a JSON text frame.
    pub async fn next_json(&mut self) -> Value {
        match self.next_written(QUIET).await {
            Some(Frame::Text(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// In-memory [`Transport`]; every connect hands its [`MockPeer`] to the test.
pub struct MockTransport {
    peers: mpsc::UnboundedSender<MockPeer>,
}

impl MockTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MockPeer>) {
        let (peers, rx) = mpsc::unbounded_channel();
        (Self { peers }, rx)
    }
}

/// What a socket write reports once the remote end has stopped reading.
fn broken_pipe(_: channel::SendError) -> Error {
    tungstenite::Error::Io(io::ErrorKind::BrokenPipe.into()).into()
}

#[async_trait]
impl Transport for MockTransport {
    type Writer = SinkMapErr<channel::UnboundedSender<Frame>, fn(channel::SendError) -> Error>;
    type Reader = channel::UnboundedReceiver<Result<Frame>>;

    async fn connect(&self, _endpoint: &Url) -> Result<(Self::Writer, Self::Reader)> {
        let (write_tx, written) = channel::unbounded();
        let (inbound, read_rx) = channel::unbounded();

        self.peers
            .send(MockPeer { written, inbound })
            .map_err(|_e| tungstenite::Error::Io(io::ErrorKind::ConnectionRefused.into()))?;

        let writer = write_tx.sink_map_err(broken_pipe as fn(channel::SendError) -> Error);
        Ok((writer, read_rx))
    }
}

/// A client over a fresh [`MockTransport`].
pub fn mock_client(config: Config) -> (Client<MockTransport>, mpsc::UnboundedReceiver<MockPeer>) {
    let (transport, peers) = MockTransport::new();
    let client = Client::with_transport(ENDPOINT, config, transport).unwrap();
    (client, peers)
}

/// Register a handler that forwards every payload into a channel.
pub async fn forward_text(client: &Client<MockTransport>) -> mpsc::UnboundedReceiver<Value> {
    let (tx, rx) = mpsc::unbounded_channel();
    client
        .on_text(move |payload| {
            _ = tx.send(payload);
        })
        .await
        .unwrap();
    rx
}

/// Wait for the next connect made by the client.
pub async fn next_peer(peers: &mut mpsc::UnboundedReceiver<MockPeer>) -> MockPeer {
    timeout(Duration::from_secs(60), peers.recv())
        .await
        .unwrap()
        .unwrap()
}
