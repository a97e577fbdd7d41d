//! A [`Transport`] that talks HTTP through `reqwest`.

#[macro_use]
extern crate tracing;

mod config;

use aiagent_model::{
    Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
use reqwest::{Client, RequestBuilder, header};

pub use config::{DEFAULT_USER_AGENT, HttpConfig, HttpConfigBuilder};

/// HTTP transport for chat-completions endpoints.
///
/// Requests are POSTed to the endpoint carried by each request, with the
/// headers it carries. Any status is handed back as a response; only
/// failures to get one are errors.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a new `HttpTransport` with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            TransportError::new(
                TransportErrorKind::Other,
                format!("failed to build the HTTP client: {err}"),
            )
        })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        req: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'static
    {
        let endpoint = req.endpoint.clone();
        let req_builder = build_request(&self.client, req);

        async move {
            let resp = req_builder.send().await.map_err(map_error)?;

            let status = resp.status().as_u16();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = resp.bytes().await.map_err(map_error)?;
            debug!(
                "{endpoint} answered {status} with {} bytes of {content_type:?}",
                body.len()
            );

            Ok(TransportResponse {
                status,
                content_type,
                body,
            })
        }
    }
}

fn build_request(client: &Client, req: TransportRequest) -> RequestBuilder {
    let mut builder = client
        .post(&req.endpoint)
        .header(header::ACCEPT, "application/json");
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(req.body)
}

#[inline]
fn map_error(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, format!("{err}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use reqwest::Method;

    use super::*;

    #[test]
    fn test_build_request() {
        let client = Client::new();
        let req = TransportRequest {
            endpoint: "https://example.com/v1/chat/completions".to_owned(),
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("Authorization".to_owned(), "Bearer sk-test".to_owned()),
            ],
            body: Bytes::from_static(br#"{"model":"m"}"#),
        };

        let built = build_request(&client, req).build().unwrap();
        assert_eq!(built.method(), Method::POST);
        assert_eq!(
            built.url().as_str(),
            "https://example.com/v1/chat/completions"
        );
        let headers = built.headers();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCEPT], "application/json");
        let body = built.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"model":"m"}"#);
    }

    #[test]
    fn test_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), None);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);

        let config = HttpConfigBuilder::new()
            .with_timeout(Duration::from_secs(30))
            .with_user_agent("aiagent-test")
            .build();
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(HttpTransport::new(config).is_ok());
    }
}
