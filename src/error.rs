use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use tokio::task::JoinError;

use crate::ws::WsError;

/// Broad category of an [`Error`], for callers that branch on the cause.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to invalid input handed to the client
    Validation,
    /// Error related to more than one caller driving the single-consumer outbound queue
    Synchronization,
    /// Internal error from dependencies or background tasks
    Internal,
    /// Error related to the WebSocket connection
    WebSocket,
}

/// Error returned by every fallible operation of this crate.
///
/// Carries its [`Kind`], the underlying cause and a backtrace captured at construction (only
/// populated when `RUST_BACKTRACE` is set).
#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// Whether this is the terminal error of a connection the peer has closed.
    ///
    /// [`crate::rtm::Client::main_loop`] normally ends with this error; callers usually treat it
    /// as a clean shutdown.
    #[must_use]
    pub fn is_connection_closed(&self) -> bool {
        matches!(
            self.downcast_ref::<WsError>(),
            Some(WsError::ConnectionClosed)
        )
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.reason)
    }
}

impl StdError for Validation {}

/// Raised when [`crate::rtm::Client::main_loop`] is entered while the outbound queue already has
/// its consumer.
#[non_exhaustive]
#[derive(Debug)]
pub struct Synchronization;

impl fmt::Display for Synchronization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "synchronization error: the main loop has already taken the outbound queue"
        )
    }
}

impl StdError for Synchronization {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<JoinError> for Error {
    fn from(e: JoinError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Synchronization> for Error {
    fn from(err: Synchronization) -> Self {
        Error::with_source(Kind::Synchronization, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_should_succeed() {
        let error = Error::validation("payload must be a JSON object");

        assert_eq!(error.kind(), Kind::Validation);
        assert_eq!(
            error.to_string(),
            "Validation: invalid input: payload must be a JSON object"
        );
    }

    #[test]
    fn synchronization_into_error_should_succeed() {
        let error: Error = Synchronization.into();

        assert_eq!(error.kind(), Kind::Synchronization);
        assert!(error.downcast_ref::<Synchronization>().is_some());
    }

    #[test]
    fn connection_closed_is_recognized() {
        let closed: Error = WsError::ConnectionClosed.into();
        let other: Error = WsError::UnexpectedFrame("binary".to_owned()).into();

        assert!(closed.is_connection_closed());
        assert!(!other.is_connection_closed());
        assert!(!Error::validation("bad").is_connection_closed());
    }

    #[test]
    fn url_parse_error_is_validation() {
        let error: Error = url::Url::parse("not a url").unwrap_err().into();

        assert_eq!(error.kind(), Kind::Validation);
        assert!(error.inner().is_some());
    }
}
