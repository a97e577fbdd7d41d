use bytes::Bytes;

use crate::TransportError;

/// An encoded request ready to be put on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransportRequest {
    /// The full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Extra headers, e.g. content type and credentials.
    pub headers: Vec<(String, String)>,
    /// The JSON payload.
    pub body: Bytes,
}

/// The raw outcome of a request that reached the remote end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// The raw body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A type that moves encoded requests to the remote model.
///
/// Once created, the transport should behave like a stateless object. It
/// can keep internal state such as a connection pool, but callers must
/// not rely on it.
pub trait Transport: Send + Sync {
    /// Sends a request.
    ///
    /// The returned future resolves exactly once, either with the response
    /// or with the error that prevented one. It must be independent of
    /// `self`.
    fn send(
        &self,
        req: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'static;
}
