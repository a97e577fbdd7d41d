use aiagent_model::{
    ChatCompletionsResponse, ChatRequest, TransportRequest, codec,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::Error;
use crate::config::Config;
use crate::model_client::ModelClient;

/// The outcome of one round trip, delivered back to the event loop.
#[derive(Debug)]
pub(crate) struct RemoteResponse {
    pub id: String,
    pub prompt_id: String,
    pub result: Result<ChatCompletionsResponse, Error>,
}

/// One in-flight round trip, identified by its correlation id.
///
/// Exactly one [`RemoteResponse`] is delivered per session that was sent
/// successfully. Dropping the session does not cancel the round trip.
#[derive(Debug)]
pub(crate) struct RequestSession {
    id: String,
    prompt_id: String,
    task: JoinHandle<()>,
}

impl RequestSession {
    /// Encodes the request and starts the round trip on the current runtime.
    ///
    /// An error is returned if the request can't be encoded, in which case
    /// nothing is delivered to `sink`.
    pub fn send(
        id: String,
        prompt_id: String,
        client: &ModelClient,
        config: &Config,
        request: &ChatRequest,
        sink: mpsc::UnboundedSender<RemoteResponse>,
    ) -> Result<Self, Error> {
        let body = codec::encode(request).map_err(|err| {
            Error::transport().with_reason(format!("failed to encode: {err}"))
        })?;
        let req = TransportRequest {
            endpoint: config.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                (
                    "Authorization".to_owned(),
                    format!("Bearer {}", config.api_key),
                ),
            ],
            body,
        };
        debug!(
            "sending {} messages with {} tools",
            request.messages.len(),
            request.tools.len()
        );

        let fut = client.send_request(req);
        let span = debug_span!("round trip", id = %id);
        let task = tokio::spawn({
            let id = id.clone();
            let prompt_id = prompt_id.clone();
            async move {
                let result = fut.await;
                if sink.send(RemoteResponse { id, prompt_id, result }).is_err() {
                    debug!("event loop is gone, dropping the response");
                }
            }
            .instrument(span)
        });

        Ok(Self {
            id,
            prompt_id,
            task,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn prompt_id(&self) -> &str {
        &self.prompt_id
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
