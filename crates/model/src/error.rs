use std::error::Error;
use std::fmt::{self, Display};

/// The kind of transport failure that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The connection could not be established or was dropped.
    Connect,
    /// The request did not complete in time.
    Timeout,
    /// Any other errors.
    Other,
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "Connection failed"),
            TransportErrorKind::Timeout => write!(f, "Timed out"),
            TransportErrorKind::Other => write!(f, "Transport error"),
        }
    }
}

/// A failure reported by a [`crate::Transport`] before any response body
/// could be read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    /// Creates a new error with the given kind and message.
    #[inline]
    pub fn new<S: Into<String>>(kind: TransportErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for TransportError {}
