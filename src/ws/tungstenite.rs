use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{Sink, SinkExt as _, Stream, StreamExt as _};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use url::Url;

use super::frame::Frame;
use super::traits::Transport;
use crate::Result;
use crate::error::Error;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production [`Transport`] backed by `tokio-tungstenite`.
///
/// `wss://` endpoints are dialed over rustls, which verifies the peer certificate chain and host
/// name against the platform's native root store.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteTransport;

#[async_trait]
impl Transport for TungsteniteTransport {
    type Writer = TungsteniteWriter;
    type Reader = TungsteniteReader;

    async fn connect(&self, endpoint: &Url) -> Result<(Self::Writer, Self::Reader)> {
        let (ws_stream, _) = connect_async(endpoint.as_str()).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%endpoint, "WebSocket connection established");

        let (write, read) = ws_stream.split();
        Ok((TungsteniteWriter(write), TungsteniteReader(read)))
    }
}

/// Writer half of a [`TungsteniteTransport`] connection.
pub struct TungsteniteWriter(SplitSink<WsStream, Message>);

impl Sink<Frame> for TungsteniteWriter {
    type Error = Error;

    fn poll_ready(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.0.poll_ready_unpin(cx).map_err(Error::from)
    }

    fn start_send(mut self: Pin<&mut Self>, item: Frame) -> Result<()> {
        self.0.start_send_unpin(item.into()).map_err(Error::from)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.0.poll_flush_unpin(cx).map_err(Error::from)
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.0.poll_close_unpin(cx).map_err(Error::from)
    }
}

/// Reader half of a [`TungsteniteTransport`] connection.
pub struct TungsteniteReader(SplitStream<WsStream>);

impl Stream for TungsteniteReader {
    type Item = Result<Frame>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.0
            .poll_next_unpin(cx)
            .map(|item| item.map(|message| message.map(Frame::from).map_err(Error::from)))
    }
}
