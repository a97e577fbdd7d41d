use std::borrow::Cow;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced a response (network failure, timeout).
    Transport,
    /// The remote end answered with a non-success HTTP status.
    HttpStatus(u16),
    /// The response body could not be decoded.
    Decode,
    /// The response carried no choices.
    EmptyResponse,
    /// The model asked for a tool that is not registered.
    UnknownTool,
    /// The tool arguments were not a parseable JSON object.
    ArgumentParse,
    /// The tool returned a non-zero code.
    ToolExecution,
    /// The orchestrator was started twice.
    AlreadyStarted,
    /// The orchestrator's event loop is not running.
    NotRunning,
    /// The event loop is running but did not serve a query in time, e.g.
    /// while a slow tool is executing.
    Busy,
    /// The event loop could not be brought up.
    Runtime,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::HttpStatus(status) => write!(f, "HTTP status {status}"),
            ErrorKind::Decode => write!(f, "Decode error"),
            ErrorKind::EmptyResponse => write!(f, "Empty response"),
            ErrorKind::UnknownTool => write!(f, "Unknown tool"),
            ErrorKind::ArgumentParse => write!(f, "Invalid tool arguments"),
            ErrorKind::ToolExecution => write!(f, "Tool execution error"),
            ErrorKind::AlreadyStarted => write!(f, "Already started"),
            ErrorKind::NotRunning => write!(f, "Not running"),
            ErrorKind::Busy => write!(f, "Event loop busy"),
            ErrorKind::Runtime => write!(f, "Runtime error"),
        }
    }
}

/// Describes an orchestration error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind, reason: None }
    }

    #[inline]
    pub(crate) fn transport() -> Self {
        Self::new(ErrorKind::Transport)
    }

    #[inline]
    pub(crate) fn http_status(status: u16) -> Self {
        Self::new(ErrorKind::HttpStatus(status))
    }

    #[inline]
    pub(crate) fn decode() -> Self {
        Self::new(ErrorKind::Decode)
    }

    #[inline]
    pub(crate) fn empty_response() -> Self {
        Self::new(ErrorKind::EmptyResponse)
    }

    #[inline]
    pub(crate) fn unknown_tool() -> Self {
        Self::new(ErrorKind::UnknownTool)
    }

    #[inline]
    pub(crate) fn argument_parse() -> Self {
        Self::new(ErrorKind::ArgumentParse)
    }

    #[inline]
    pub(crate) fn tool_execution() -> Self {
        Self::new(ErrorKind::ToolExecution)
    }

    #[inline]
    pub(crate) fn already_started() -> Self {
        Self::new(ErrorKind::AlreadyStarted)
    }

    #[inline]
    pub(crate) fn not_running() -> Self {
        Self::new(ErrorKind::NotRunning)
    }

    #[inline]
    pub(crate) fn busy() -> Self {
        Self::new(ErrorKind::Busy)
    }

    #[inline]
    pub(crate) fn runtime() -> Self {
        Self::new(ErrorKind::Runtime)
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }

    /// Returns the negative status code reported for a failed round trip.
    ///
    /// A successful round trip is reported with `0`.
    pub fn status_code(&self) -> i32 {
        match self.kind {
            ErrorKind::Transport => -1,
            ErrorKind::Decode => -2,
            ErrorKind::EmptyResponse => -3,
            ErrorKind::HttpStatus(status) => -i32::from(status),
            _ => -100,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.kind, reason),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}
