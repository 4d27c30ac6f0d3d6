#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use futures::future::BoxFuture;
use futures::{SinkExt as _, StreamExt as _};
use tokio::sync::Mutex;
use url::Url;

use super::error::WsError;
use super::frame::Frame;
use super::traits::Transport;
use crate::Result;
use crate::error::Error;

/// Called with every transport fault: connect, read and write failures.
pub type ErrorObserver = Arc<dyn Fn(&Error) + Send + Sync>;
/// Called once, from the read loop, when the connection goes away.
pub type CloseObserver = Arc<dyn Fn() + Send + Sync>;
/// Called for every inbound frame other than [`Frame::Close`], in arrival order.
pub type MessageObserver = Arc<dyn Fn(Frame) -> BoxFuture<'static, ()> + Send + Sync>;

/// Event observers attached to a connection.
///
/// The error and close observers are fixed when the [`ConnectionHandle`] is built. Message
/// observers are added later through [`Connection::on_message`]. Every observer receives what it
/// needs through its own captures; none of them can reach back into the handle that owns them.
pub struct Observers {
    on_error: ErrorObserver,
    on_close: CloseObserver,
    on_message: RwLock<Vec<MessageObserver>>,
}

impl Observers {
    pub fn new<E, C>(on_error: E, on_close: C) -> Self
    where
        E: Fn(&Error) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Self {
            on_error: Arc::new(on_error),
            on_close: Arc::new(on_close),
            on_message: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn error(&self, error: &Error) {
        (self.on_error)(error);
    }

    fn close(&self) {
        (self.on_close)();
    }

    fn add_message(&self, observer: MessageObserver) {
        // A Vec of observers has no inconsistent intermediate state, so a poisoned lock is usable.
        self.on_message
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    fn message_observers(&self) -> Vec<MessageObserver> {
        self.on_message
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Log a transport error with its kind, message and backtrace. Never terminates anything.
pub fn log_error(error: &Error) {
    #[cfg(feature = "tracing")]
    tracing::error!(
        kind = ?error.kind(),
        backtrace = %error.backtrace(),
        "{error}"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = error;
}

/// One live connection, only reachable through [`ConnectionHandle::with_connection`].
pub struct Connection<T: Transport> {
    writer: T::Writer,
    /// Present until the read loop has been started
    reader: Option<T::Reader>,
    observers: Arc<Observers>,
    closed: Arc<AtomicBool>,
}

impl<T: Transport> Connection<T> {
    /// Write one frame to the socket.
    ///
    /// Transport failures are reported to the error observer and returned. Once the peer has
    /// closed the connection every write fails with [`WsError::ConnectionClosed`].
    pub async fn send(&mut self, frame: Frame) -> Result<()> {
        if self.is_closed() {
            return Err(WsError::ConnectionClosed.into());
        }

        if let Err(e) = self.writer.send(frame).await {
            self.observers.error(&e);
            return Err(e);
        }

        Ok(())
    }

    /// Install an additional message observer.
    pub fn on_message<F>(&self, observer: F)
    where
        F: Fn(Frame) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        self.observers.add_message(Arc::new(observer));
    }

    /// Whether the close event has been observed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn start_reading(&mut self) {
        if let Some(reader) = self.reader.take() {
            tokio::spawn(read_loop(
                reader,
                Arc::clone(&self.observers),
                Arc::clone(&self.closed),
            ));
        }
    }
}

/// Transport read loop: feeds frames to the message observers until the stream ends.
async fn read_loop<R>(mut reader: R, observers: Arc<Observers>, closed: Arc<AtomicBool>)
where
    R: futures::Stream<Item = Result<Frame>> + Unpin,
{
    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Frame::Close) => break,
            Ok(frame) => {
                for observer in observers.message_observers() {
                    observer(frame.clone()).await;
                }
            }
            // Log and keep reading; the transport ends the stream if the fault was fatal
            Err(e) => observers.error(&e),
        }
    }

    closed.store(true, Ordering::Release);
    observers.close();
}

struct Inner<T: Transport> {
    endpoint: Url,
    transport: T,
    observers: Arc<Observers>,
    slot: Mutex<Option<Connection<T>>>,
}

/// Shared, lazily connected handle to the single connection.
///
/// The connection is dialed on the first [`Self::with_connection`] call and reused by every
/// later one. It is never recreated: after the peer closes, the handle keeps the dead
/// connection and writes fail.
///
/// # Example
///
/// ```ignore
/// let handle = ConnectionHandle::new(endpoint, TungsteniteTransport, Observers::new(log_error, || {}));
///
/// handle
///     .with_connection(|conn| Box::pin(conn.send(Frame::ping())))
///     .await?;
/// ```
pub struct ConnectionHandle<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Clone for ConnectionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> ConnectionHandle<T> {
    #[must_use]
    pub fn new(endpoint: Url, transport: T, observers: Observers) -> Self {
        Self {
            inner: Arc::new(Inner {
                endpoint,
                transport,
                observers: Arc::new(observers),
                slot: Mutex::new(None),
            }),
        }
    }

    /// The endpoint this handle dials.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Run `f` with exclusive access to the connection, connecting first if needed.
    ///
    /// Borrows are serialized, so two writers never interleave on the socket. The read loop runs
    /// independently and is started once the first borrow has finished, which lets that borrow
    /// install message observers before any frame is dispatched.
    pub async fn with_connection<F, R>(&self, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c mut Connection<T>) -> BoxFuture<'c, Result<R>> + Send,
        R: Send,
    {
        let mut slot = self.inner.slot.lock().await;

        if slot.is_none() {
            *slot = Some(self.connect().await?);
        }
        let Some(connection) = slot.as_mut() else {
            return Err(WsError::ConnectionClosed.into());
        };

        let result = f(&mut *connection).await;
        connection.start_reading();

        result
    }

    /// A handle that does not keep the connection alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakConnectionHandle<T> {
        WeakConnectionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    async fn connect(&self) -> Result<Connection<T>> {
        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = %self.inner.endpoint, "Connecting");

        let (writer, reader) = self
            .inner
            .transport
            .connect(&self.inner.endpoint)
            .await
            .inspect_err(|e| self.inner.observers.error(e))?;

        Ok(Connection {
            writer,
            reader: Some(reader),
            observers: Arc::clone(&self.inner.observers),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }
}

/// Non-owning counterpart of [`ConnectionHandle`], for observers stored on the connection.
pub struct WeakConnectionHandle<T: Transport> {
    inner: Weak<Inner<T>>,
}

impl<T: Transport> Clone for WeakConnectionHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: Transport> WeakConnectionHandle<T> {
    #[must_use]
    pub fn upgrade(&self) -> Option<ConnectionHandle<T>> {
        self.inner.upgrade().map(|inner| ConnectionHandle { inner })
    }
}
