#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

use tokio_tungstenite::tungstenite;

use crate::error::{Error, Kind};

/// Failures of the WebSocket connection and of the frames travelling over it.
#[non_exhaustive]
#[derive(Debug)]
pub enum WsError {
    /// The socket failed while dialing, reading or writing
    Transport(tungstenite::Error),
    /// An inbound text frame did not hold a JSON document
    MalformedPayload(serde_json::Error),
    /// The peer closed the connection; nothing can be written anymore
    ConnectionClosed,
    /// A frame the protocol has no use for
    UnexpectedFrame(String),
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "WebSocket transport error: {e}"),
            Self::MalformedPayload(e) => write!(f, "Inbound text frame is not JSON: {e}"),
            Self::ConnectionClosed => write!(f, "WebSocket connection closed"),
            Self::UnexpectedFrame(kind) => write!(f, "Unexpected {kind} frame"),
        }
    }
}

impl StdError for WsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::MalformedPayload(e) => Some(e),
            Self::ConnectionClosed | Self::UnexpectedFrame(_) => None,
        }
    }
}

impl From<WsError> for Error {
    fn from(e: WsError) -> Self {
        Error::with_source(Kind::WebSocket, e)
    }
}

impl From<tungstenite::Error> for Error {
    fn from(e: tungstenite::Error) -> Self {
        WsError::Transport(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_closed_maps_to_websocket_kind() {
        let error: Error = WsError::ConnectionClosed.into();

        assert_eq!(error.kind(), Kind::WebSocket);
        assert!(matches!(
            error.downcast_ref::<WsError>(),
            Some(WsError::ConnectionClosed)
        ));
    }

    #[test]
    fn tungstenite_error_keeps_source() {
        let error: Error = tungstenite::Error::AlreadyClosed.into();

        assert_eq!(error.kind(), Kind::WebSocket);
        let ws = error.downcast_ref::<WsError>().unwrap();
        assert!(matches!(ws, WsError::Transport(_)));
        assert!(ws.source().is_some());
    }

    #[test]
    fn malformed_payload_names_the_parse_failure() {
        let parse = serde_json::from_str::<serde_json::Value>("{\"type\": ").unwrap_err();
        let error = WsError::MalformedPayload(parse);

        assert!(error.to_string().starts_with("Inbound text frame is not JSON"));
        assert!(error.source().is_some());
    }
}
