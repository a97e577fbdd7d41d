use std::error::Error;
use std::fmt;
use std::io;

/// A type of error which can be returned when the event loop thread
/// can't be brought up.
pub struct SpawnError {
    what: &'static str,
    source: io::Error,
}

impl SpawnError {
    #[inline]
    pub(crate) fn runtime(source: io::Error) -> Self {
        Self {
            what: "failed to build the runtime",
            source,
        }
    }

    #[inline]
    pub(crate) fn thread(source: io::Error) -> Self {
        Self {
            what: "failed to spawn the thread",
            source,
        }
    }
}

impl fmt::Debug for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnError")
            .field("what", &self.what)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.what, self.source)
    }
}

impl Error for SpawnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
