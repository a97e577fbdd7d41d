use std::pin::Pin;
use std::sync::Arc;

use aiagent_model::{
    ChatCompletionsResponse, Transport, TransportError, TransportRequest,
    TransportResponse, codec,
};
use mime::Mime;

use crate::Error;

type SendResult = Result<TransportResponse, TransportError>;
type BoxedSendFuture = Pin<Box<dyn Future<Output = SendResult> + Send>>;
type HandlerFn = Arc<dyn Fn(TransportRequest) -> BoxedSendFuture + Send + Sync>;

/// A wrapper around a transport that provides a type-erased interface for
/// the other modules, and decodes what comes back.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        // We have to erase the type `T`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn =
            Arc::new(move |req| Box::pin(transport.send(req)));
        Self { handler_fn }
    }

    /// Hands the request to the transport and returns a future of the
    /// decoded response.
    ///
    /// The transport is called before this method returns, so requests
    /// reach it in the order they were sent.
    #[inline]
    pub fn send_request(
        &self,
        req: TransportRequest,
    ) -> impl Future<Output = Result<ChatCompletionsResponse, Error>> + Send + 'static
    {
        trace!("sending a request to {}", req.endpoint);
        let fut = (self.handler_fn)(req);
        async move { handle_response(fut.await) }
    }
}

fn handle_response(
    resp_or_err: SendResult,
) -> Result<ChatCompletionsResponse, Error> {
    let resp = resp_or_err.map_err(|err| {
        Error::transport().with_reason(format!("{err}"))
    })?;

    if !resp.is_success() {
        let body = String::from_utf8_lossy(&resp.body);
        return Err(Error::http_status(resp.status)
            .with_reason(truncate(&body, 256).to_owned()));
    }

    // A missing content type is tolerated, a wrong one is not.
    if let Some(content_type) = resp.content_type.as_deref() {
        let is_json = content_type
            .parse::<Mime>()
            .map(|m| {
                m.subtype() == mime::JSON
                    || m.suffix().is_some_and(|s| s == mime::JSON)
            })
            .unwrap_or(false);
        if !is_json {
            return Err(Error::decode().with_reason(format!(
                "unexpected content type: {content_type}"
            )));
        }
    }

    let parsed = codec::decode(&resp.body)
        .map_err(|err| Error::decode().with_reason(format!("{err}")))?;
    trace!("decoded a response with {} choices", parsed.choices.len());
    Ok(parsed)
}

#[inline]
fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use aiagent_model::TransportErrorKind;
    use aiagent_test_model::{PresetResponse, ScriptedTransport};
    use bytes::Bytes;

    use super::*;
    use crate::ErrorKind;

    fn request() -> TransportRequest {
        TransportRequest {
            endpoint: "http://localhost/v1/chat/completions".to_owned(),
            headers: vec![],
            body: Bytes::from_static(b"{}"),
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let transport = ScriptedTransport::new();
        transport.push_reply(PresetResponse::assistant("How are you?"));
        let client = ModelClient::new(transport.clone());

        let resp = client.send_request(request()).await.unwrap();
        assert_eq!(resp.assistant_message().unwrap().content, "How are you?");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let transport = ScriptedTransport::new();
        transport.push_failure(TransportErrorKind::Connect);
        transport.push_status(503, "overloaded");
        transport.push_raw("<html>");
        let client = ModelClient::new(transport);

        let err = client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status_code(), -1);

        let err = client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HttpStatus(503));
        assert_eq!(err.reason(), "overloaded");

        let err = client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        // The script is exhausted.
        let err = client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_content_type() {
        let ok = |content_type: Option<&str>| {
            handle_response(Ok(TransportResponse {
                status: 200,
                content_type: content_type.map(ToOwned::to_owned),
                body: Bytes::from_static(br#"{"choices":[]}"#),
            }))
        };
        assert!(ok(None).is_ok());
        assert!(ok(Some("application/json")).is_ok());
        assert!(ok(Some("application/json; charset=utf-8")).is_ok());
        assert!(ok(Some("application/problem+json")).is_ok());
        let err = ok(Some("text/event-stream")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
