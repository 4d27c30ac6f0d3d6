use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use url::Url;

use super::outbound::{self, Outbound};
use super::types::{MessageId, generate_id, stamp};
use super::{dispatcher, heartbeat};
use crate::Result;
use crate::error::{Error, Synchronization};
use crate::ws::connection::log_error;
use crate::ws::{Config, ConnectionHandle, Observers, Transport, TungsteniteTransport};

/// Real-time messaging client.
///
/// Holds one lazily dialed connection, an unbounded outbound queue drained by a single pump
/// task, and a heartbeat task. [`Client`] is cheap to clone and every clone drives the same
/// connection.
///
/// # Examples
///
/// ```rust, no_run
/// use serde_json::json;
/// use slack_rtm_client::rtm::Client;
/// use slack_rtm_client::ws::Config;
///
/// #[tokio::main]
/// async fn main() -> slack_rtm_client::Result<()> {
///     let client = Client::new("wss://rtm.example.com/websocket", Config::default())?;
///
///     let replies = client.clone();
///     client
///         .on_text(move |payload| {
///             if payload["type"] == "message" {
///                 let _id = replies.send_message(&json!({
///                     "type": "message",
///                     "channel": payload["channel"],
///                     "text": "pong",
///                 }));
///             }
///         })
///         .await?;
///
///     client.main_loop().await
/// }
/// ```
pub struct Client<T: Transport = TungsteniteTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ClientInner<T: Transport> {
    /// Configuration for the connection
    config: Config,
    /// The single shared connection
    connection: ConnectionHandle<T>,
    /// Producer side of the outbound queue
    queue: mpsc::UnboundedSender<Outbound>,
    /// Consumer side of the outbound queue, until [`Client::main_loop`] takes it
    pending: Mutex<Option<mpsc::UnboundedReceiver<Outbound>>>,
}

impl Client<TungsteniteTransport> {
    /// Create a client for `endpoint` over `tokio-tungstenite`.
    ///
    /// Nothing is dialed until the connection is first used.
    pub fn new(endpoint: &str, config: Config) -> Result<Self> {
        Self::with_transport(endpoint, config, TungsteniteTransport)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client for `endpoint` over a custom [`Transport`].
    pub fn with_transport(endpoint: &str, config: Config, transport: T) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        if !matches!(endpoint.scheme(), "ws" | "wss") {
            return Err(Error::validation(format!(
                "unsupported endpoint scheme `{}`, expected `ws` or `wss`",
                endpoint.scheme()
            )));
        }
        if config.heartbeat_interval.is_zero() {
            return Err(Error::validation("heartbeat interval must be non-zero"));
        }

        let (queue, pending) = mpsc::unbounded_channel();

        // The close observer runs on the read loop; it gets its own sender up front
        let closed_queue = queue.clone();
        let observers = Observers::new(log_error, move || {
            #[cfg(feature = "tracing")]
            tracing::info!("Disconnected");
            _ = closed_queue.send(Outbound::Shutdown);
        });

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                connection: ConnectionHandle::new(endpoint, transport, observers),
                queue,
                pending: Mutex::new(Some(pending)),
            }),
        })
    }

    /// Enqueue `payload` for delivery and return the `id` injected into it.
    ///
    /// Fire-and-forget: the call never waits on the network and reports nothing about delivery.
    /// Once the connection has closed, messages are dropped. Fails only when `payload` does not
    /// serialize to a JSON object.
    pub fn send_message<P: Serialize + ?Sized>(&self, payload: &P) -> Result<MessageId> {
        let id = generate_id();
        let message = stamp(payload, id)?;

        if self
            .inner
            .queue
            .send(Outbound::Application(message))
            .is_err()
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(id, "Outbound pump has stopped, dropping message");
        }

        Ok(id)
    }

    /// Register `handler` for every inbound text frame, decoded from JSON.
    ///
    /// The handler runs on the connection's read loop. Ping frames are answered and pong frames
    /// are swallowed before it; frames that are neither, or text that is not JSON, are logged and
    /// dropped. Dials the connection if this is its first use.
    pub async fn on_text<H>(&self, handler: H) -> Result<()>
    where
        H: Fn(Value) + Send + Sync + 'static,
    {
        let observer = dispatcher::observer(self.inner.connection.downgrade(), handler);

        self.inner
            .connection
            .with_connection(|conn| {
                Box::pin(async move {
                    conn.on_message(observer);
                    Ok::<_, Error>(())
                })
            })
            .await
    }

    /// Run the heartbeat and the outbound pump until the connection is done with.
    ///
    /// The pump ends when the connection closes; the heartbeat ends on its first failed ping,
    /// whose error is returned. A failed heartbeat also stops the pump, so this returns even when
    /// the connection could never be dialed. There is no restart: build a new [`Client`] to
    /// connect again.
    pub async fn main_loop(&self) -> Result<()> {
        let queue = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(Synchronization)?;

        let mut heartbeat = tokio::spawn(heartbeat::keep_alive(
            self.inner.connection.clone(),
            self.inner.config.heartbeat_interval,
        ));
        let mut pump = tokio::spawn(outbound::pump(queue, self.inner.connection.clone()));

        tokio::select! {
            result = &mut heartbeat => {
                pump.abort();
                result?
            }
            result = &mut pump => {
                result?;
                heartbeat.await?
            }
        }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The endpoint this client connects to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        self.inner.connection.endpoint()
    }
}
