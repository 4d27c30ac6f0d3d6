use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::Result;
use crate::ws::{ConnectionHandle, Frame, Transport};

/// Write a PING control frame every `period`, directly through the connection.
///
/// Pings bypass the outbound queue, so a backlog of application messages never delays them.
/// The task has no view of the pump. It ends on the first ping that cannot be written, whatever
/// the cause: the peer closed the connection, the socket faulted mid-write, or the connection
/// could not be dialed at all.
pub(crate) async fn keep_alive<T: Transport>(
    connection: ConnectionHandle<T>,
    period: Duration,
) -> Result<()> {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if let Err(e) = connection
            .with_connection(|conn| Box::pin(conn.send(Frame::ping())))
            .await
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "Unable to send heartbeat, terminating...");
            return Err(e);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Heartbeat ping sent");
    }
}
