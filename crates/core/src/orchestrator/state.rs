use std::collections::HashMap;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use aiagent_event_loop::{Bridge, SharedQueue};
use aiagent_model::{ChatCompletionsResponse, ChatRequest, Message};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use super::{Answer, Prompt, Shared};
use crate::Error;
use crate::config::Config;
use crate::conversation::ConversationHistory;
use crate::model_client::ModelClient;
use crate::session::{RemoteResponse, RequestSession};
use crate::tool::Executor;

/// Requests served by the event loop on behalf of other threads.
pub(super) enum Command {
    PendingSessions(std_mpsc::SyncSender<Vec<String>>),
}

/// Everything owned by the event-loop thread.
///
/// The session table and the removal queue are only touched from the loop.
/// Sessions are erased by the sweep alone, never while their response is
/// being handled.
pub(super) struct LoopState {
    config: Arc<Config>,
    client: ModelClient,
    executor: Executor,
    history: Arc<ConversationHistory>,
    inbox: Arc<SharedQueue<Prompt>>,
    outbox: Arc<SharedQueue<Answer>>,
    bridge: Bridge,
    sessions: HashMap<String, RequestSession>,
    removals: SharedQueue<String>,
    completion_tx: mpsc::UnboundedSender<RemoteResponse>,
    next_seq: u64,
}

impl LoopState {
    pub(super) fn new(
        shared: &Shared,
        client: ModelClient,
        completion_tx: mpsc::UnboundedSender<RemoteResponse>,
    ) -> Self {
        Self {
            config: Arc::clone(&shared.config),
            client,
            executor: Executor::new(Arc::clone(&shared.tools)),
            history: Arc::clone(&shared.history),
            inbox: Arc::clone(&shared.inbox),
            outbox: Arc::clone(&shared.outbox),
            bridge: shared.bridge.clone(),
            sessions: HashMap::new(),
            removals: SharedQueue::new(),
            completion_tx,
            next_seq: 0,
        }
    }

    pub(super) async fn run(
        mut self,
        mut completion_rx: mpsc::UnboundedReceiver<RemoteResponse>,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
    ) {
        let bridge = self.bridge.clone();
        let mut sweep = time::interval(self.config.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                biased;

                resp = completion_rx.recv() => {
                    // We hold a sender, so the channel never closes.
                    if let Some(resp) = resp {
                        self.on_remote_response(resp);
                    }
                }
                cmd = command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        debug!("all orchestrator handles are dropped");
                        break;
                    };
                    self.handle_command(cmd);
                }
                _ = bridge.woken() => self.drain_one_prompt(),
                _ = sweep.tick() => self.sweep(),
            }
        }
    }

    fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::PendingSessions(reply_tx) => {
                let ids = self.sessions.keys().cloned().collect();
                reply_tx.send(ids).ok();
            }
        }
    }

    /// Takes one prompt off the inbox and sends it.
    ///
    /// If more prompts are waiting, the bridge is woken again so the rest
    /// of the inbox is drained on the following passes.
    fn drain_one_prompt(&mut self) {
        let Some(Prompt { id, text }) = self.inbox.try_pop() else {
            trace!("spurious wake, the inbox is empty");
            return;
        };
        if !self.inbox.is_empty() {
            self.bridge.wake();
        }

        if text.is_empty() {
            warn!("dropping empty prompt {id}");
            return;
        }
        debug!("draining prompt {id}");
        self.history.append(Message::user(text));
        self.open_session(id.clone(), id);
    }

    fn open_session(&mut self, id: String, prompt_id: String) {
        let request = self.build_request();
        let result = RequestSession::send(
            id.clone(),
            prompt_id.clone(),
            &self.client,
            &self.config,
            &request,
            self.completion_tx.clone(),
        );
        match result {
            Ok(session) => {
                if self.sessions.insert(id, session).is_some() {
                    warn!("replaced a pending session with the same id");
                }
            }
            Err(err) => self.on_remote_response(RemoteResponse {
                id,
                prompt_id,
                result: Err(err),
            }),
        }
    }

    fn build_request(&self) -> ChatRequest {
        let history = self.history.snapshot();
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(system_prompt) = &self.config.system_prompt {
            messages.push(Message::system(system_prompt.clone()));
        }
        messages.extend(history);
        ChatRequest {
            model: self.config.model.clone(),
            messages,
            tools: self.executor.definitions(),
        }
    }

    fn on_remote_response(&mut self, resp: RemoteResponse) {
        let RemoteResponse {
            id,
            prompt_id,
            result,
        } = resp;
        let span = debug_span!("remote response", id = %id, prompt = %prompt_id);
        let _enter = span.enter();

        match result {
            Ok(response) => self.handle_response(&id, &prompt_id, response),
            Err(err) => {
                error!(status = err.status_code(), "round trip failed: {err}");
            }
        }
        self.removals.push(id);
    }

    fn handle_response(
        &mut self,
        id: &str,
        prompt_id: &str,
        response: ChatCompletionsResponse,
    ) {
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "usage"
            );
        }
        if response.choices.is_empty() {
            let err = Error::empty_response();
            error!(status = err.status_code(), "{err}");
            return;
        }
        let Some(message) = response.assistant_message().cloned() else {
            warn!("no assistant message among {} choices", response.choices.len());
            return;
        };
        if response.choices.len() > 1 {
            debug!("ignoring {} other choices", response.choices.len() - 1);
        }

        self.history.append(message.clone());
        if !message.has_tool_calls() {
            info!("publishing answer");
            self.outbox.push(Answer {
                status: 0,
                error: "OK".to_owned(),
                id: id.to_owned(),
                prompt_id: prompt_id.to_owned(),
                response,
            });
            return;
        }

        debug!("resolving {} tool calls", message.tool_calls.len());
        for call in &message.tool_calls {
            let tool_message = match self.executor.execute(call) {
                Ok(tool_message) => tool_message,
                Err(err) => {
                    error!("skipping tool call {}: {err}", call.id);
                    continue;
                }
            };
            self.history.append(tool_message);
            let next_id = self.next_correlation_id(prompt_id);
            debug!("resubmitting as {next_id}");
            self.open_session(next_id, prompt_id.to_owned());
        }
    }

    #[inline]
    fn next_correlation_id(&mut self, prompt_id: &str) -> String {
        self.next_seq += 1;
        format!("{prompt_id}#{}", self.next_seq)
    }

    fn sweep(&mut self) {
        for id in self.removals.drain() {
            if let Some(session) = self.sessions.remove(&id) {
                trace!(
                    finished = session.is_finished(),
                    "retired session {} of {}",
                    session.id(),
                    session.prompt_id()
                );
            }
        }
    }
}
