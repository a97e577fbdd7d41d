//! A scripted in-process transport for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use aiagent_model::{
    Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
use bytes::Bytes;
use tokio::time::sleep;

pub use preset::*;

#[derive(Clone, Debug)]
enum ScriptStep {
    Reply(PresetResponse),
    Status(u16, String),
    Raw(String),
    Failure(TransportErrorKind),
}

#[derive(Default)]
struct Inner {
    script: VecDeque<ScriptStep>,
    requests: Vec<TransportRequest>,
    delay: Option<Duration>,
}

/// A local fake transport for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// remote end should answer. Every request consumes the next step, in the
/// order the requests were sent. If there are no enough steps in the script,
/// a transport error is returned.
///
/// Clones share the same script and the same request log.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn push(&self, step: ScriptStep) {
        self.lock().script.push_back(step);
    }

    /// Answers the next request with `preset` and status 200.
    #[inline]
    pub fn push_reply(&self, preset: PresetResponse) {
        self.push(ScriptStep::Reply(preset));
    }

    /// Answers the next request with the given status and body.
    #[inline]
    pub fn push_status<S: Into<String>>(&self, status: u16, body: S) {
        self.push(ScriptStep::Status(status, body.into()));
    }

    /// Answers the next request with status 200 and a raw JSON body.
    #[inline]
    pub fn push_raw<S: Into<String>>(&self, body: S) {
        self.push(ScriptStep::Raw(body.into()));
    }

    /// Fails the next request without a response.
    #[inline]
    pub fn push_failure(&self, kind: TransportErrorKind) {
        self.push(ScriptStep::Failure(kind));
    }

    /// Delays every answer by `duration`.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns the requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of steps not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        req: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'static
    {
        // The step is picked when the request is sent, not when the future
        // is polled, so steps follow the send order.
        let (step, delay) = {
            let mut inner = self.lock();
            inner.requests.push(req);
            (inner.script.pop_front(), inner.delay)
        };

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            let json = |status: u16, body: String| TransportResponse {
                status,
                content_type: Some("application/json".to_owned()),
                body: Bytes::from(body),
            };
            match step {
                Some(ScriptStep::Reply(preset)) => Ok(json(200, preset.to_body())),
                Some(ScriptStep::Status(status, body)) => Ok(json(status, body)),
                Some(ScriptStep::Raw(body)) => Ok(json(200, body)),
                Some(ScriptStep::Failure(kind)) => {
                    Err(TransportError::new(kind, "scripted failure"))
                }
                None => Err(TransportError::new(
                    TransportErrorKind::Other,
                    "no enough steps",
                )),
            }
        }
    }
}
