//! Core traits for the streaming transport.

use async_trait::async_trait;
use futures::{Sink, Stream};
use url::Url;

use super::frame::Frame;
use crate::Result;
use crate::error::Error;

/// Transport boundary for WebSocket I/O.
///
/// A transport turns an endpoint into one full-duplex connection, split into a writer half and
/// a reader half so that inbound dispatch never waits on an outbound write.
///
/// # Example
///
/// ```ignore
/// pub struct LoopbackTransport;
///
/// #[async_trait]
/// impl Transport for LoopbackTransport {
///     type Writer = MyWriter;
///     type Reader = MyReader;
///
///     async fn connect(&self, endpoint: &Url) -> Result<(Self::Writer, Self::Reader)> {
///         /* ... */
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Outbound half of a connection.
    type Writer: Sink<Frame, Error = Error> + Send + Unpin + 'static;
    /// Inbound half of a connection. The stream ending means the connection is gone.
    type Reader: Stream<Item = Result<Frame>> + Send + Unpin + 'static;

    /// Establish a new connection to `endpoint`.
    async fn connect(&self, endpoint: &Url) -> Result<(Self::Writer, Self::Reader)>;
}
