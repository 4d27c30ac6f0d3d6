//! Core WebSocket infrastructure.
//!
//! This module provides the transport-level half of the client: a single lazily dialed
//! connection shared behind an exclusive-borrow primitive, the frame model, and the transport
//! seam that lets tests swap the network out.
//!
//! # Architecture
//!
//! - [`ConnectionHandle`]: lazily connected, reused connection with serialized writes
//! - [`Observers`]: error/close/message callbacks wired into the connection's read loop
//! - [`Transport`]: trait for dialing an endpoint into a writer/reader pair
//! - [`TungsteniteTransport`]: the `tokio-tungstenite` implementation
//!
//! # Example
//!
//! ```ignore
//! let handle = ConnectionHandle::new(endpoint, TungsteniteTransport, Observers::new(log_error, || {}));
//! handle
//!     .with_connection(|conn| Box::pin(conn.send(Frame::ping())))
//!     .await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod traits;
pub mod tungstenite;

pub use config::Config;
pub use connection::{Connection, ConnectionHandle, Observers, WeakConnectionHandle};
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
pub use frame::Frame;
pub use traits::*;
pub use tungstenite::TungsteniteTransport;
