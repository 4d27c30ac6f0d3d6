use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::ws::{Frame, Transport, WeakConnectionHandle, WsError};

/// What to do with one inbound frame.
#[derive(Debug, PartialEq)]
enum Action {
    /// Write this frame back through the connection
    Reply(Frame),
    /// Hand the decoded payload to the handler
    Deliver(Value),
    /// Nothing beyond the log line
    Ignore,
}

/// Classify an inbound frame. Logging happens here, exactly once per frame.
fn classify(frame: Frame) -> Action {
    match frame {
        Frame::Ping(_) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Received ping message");
            Action::Reply(Frame::pong())
        }
        Frame::Pong(_) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Received pong message");
            Action::Ignore
        }
        Frame::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(payload) => Action::Deliver(payload),
            Err(e) => {
                let error = WsError::MalformedPayload(e);
                #[cfg(feature = "tracing")]
                tracing::warn!(%text, %error, "Dropping text message");
                #[cfg(not(feature = "tracing"))]
                let _ = (&text, &error);
                Action::Ignore
            }
        },
        other => {
            let error = WsError::UnexpectedFrame(other.kind().to_owned());
            #[cfg(feature = "tracing")]
            tracing::warn!(
                %error,
                data = %String::from_utf8_lossy(other.data()),
                "Received unknown message type"
            );
            #[cfg(not(feature = "tracing"))]
            let _ = (&other, &error);
            Action::Ignore
        }
    }
}

/// Build the message observer that routes inbound frames to `handler`.
///
/// The observer lives on the connection, so it holds the handle weakly.
pub(crate) fn observer<T, H>(
    connection: WeakConnectionHandle<T>,
    handler: H,
) -> impl Fn(Frame) -> BoxFuture<'static, ()> + Send + Sync + 'static
where
    T: Transport,
    H: Fn(Value) + Send + Sync + 'static,
{
    let handler = Arc::new(handler);

    move |frame: Frame| -> BoxFuture<'static, ()> {
        let connection = connection.clone();
        let handler = Arc::clone(&handler);

        Box::pin(async move {
            match classify(frame) {
                Action::Deliver(payload) => (*handler)(payload),
                Action::Reply(reply) => {
                    let Some(connection) = connection.upgrade() else {
                        return;
                    };
                    if let Err(e) = connection
                        .with_connection(|conn| Box::pin(conn.send(reply)))
                        .await
                    {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(error = %e, "Unable to answer ping");
                        #[cfg(not(feature = "tracing"))]
                        let _ = &e;
                    }
                }
                Action::Ignore => {}
            }
        })
    }
}
