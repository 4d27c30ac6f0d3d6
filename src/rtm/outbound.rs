use tokio::sync::mpsc;

use crate::ws::{ConnectionHandle, Frame, Transport};

/// Item on the outbound queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    /// Serialized application message
    Application(String),
    /// The connection closed; the pump must stop
    Shutdown,
}

/// Drain the outbound queue into the connection, strictly in enqueue order.
///
/// This is the only writer of application messages. It returns once [`Outbound::Shutdown`] is
/// dequeued and never receives from the queue again.
pub(crate) async fn pump<T: Transport>(
    mut queue: mpsc::UnboundedReceiver<Outbound>,
    connection: ConnectionHandle<T>,
) {
    while let Some(item) = queue.recv().await {
        let Outbound::Application(message) = item else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Connection closed, stopping outbound pump");
            break;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(%message, size = message.len(), "Sending message");

        // Transport faults were already reported by the error observer
        if let Err(e) = connection
            .with_connection(|conn| Box::pin(conn.send(Frame::Text(message))))
            .await
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %e, "Outbound message was not delivered");
            #[cfg(not(feature = "tracing"))]
            let _ = &e;
        }
    }
}
