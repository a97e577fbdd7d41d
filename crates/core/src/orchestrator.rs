mod builder;
mod state;

use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use aiagent_event_loop::{Bridge, EventLoop, EventLoopHandle, SharedQueue};
use aiagent_model::{ChatCompletionsResponse, Message, ToolDefinition};
use tokio::sync::mpsc;

use crate::Error;
use crate::config::Config;
use crate::conversation::ConversationHistory;
use crate::model_client::ModelClient;
use crate::tool::{ToolFunction, ToolRegistry};
pub use builder::OrchestratorBuilder;
use state::{Command, LoopState};

const LOOP_THREAD_NAME: &str = "aiagent-event-loop";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(1);

/// A fully resolved answer to a submitted prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    /// `0` for a published answer.
    pub status: i32,
    /// `"OK"` for a published answer.
    pub error: String,
    /// Correlation id of the round trip that produced the answer.
    ///
    /// Equal to [`Answer::prompt_id`] unless tool calls were resolved on
    /// the way, in which case it is `<prompt_id>#<n>`.
    pub id: String,
    /// The id the prompt was submitted with.
    pub prompt_id: String,
    /// The decoded response.
    pub response: ChatCompletionsResponse,
}

impl Answer {
    /// Returns the text of the assistant message, or an empty string.
    #[inline]
    pub fn content(&self) -> &str {
        self.response
            .assistant_message()
            .map(|msg| msg.content.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub(crate) struct Prompt {
    pub id: String,
    pub text: String,
}

struct LoopParts {
    client: ModelClient,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

struct Shared {
    config: Arc<Config>,
    inbox: Arc<SharedQueue<Prompt>>,
    outbox: Arc<SharedQueue<Answer>>,
    bridge: Bridge,
    history: Arc<ConversationHistory>,
    tools: Arc<RwLock<ToolRegistry>>,
    command_tx: mpsc::UnboundedSender<Command>,
    parts: Mutex<Option<LoopParts>>,
    event_loop: Mutex<Option<EventLoopHandle>>,
}

/// The request-orchestration engine.
///
/// Prompts submitted from any thread are queued and handed to a single
/// event-loop thread, which talks to the model, resolves tool calls and
/// publishes the final answers. Callers never block on the network: they
/// collect answers with [`Orchestrator::poll_answer`] or
/// [`Orchestrator::wait_answer`].
///
/// The handle is cheap to clone. The event loop exits once [`shutdown`]
/// is called or every handle is dropped.
///
/// [`shutdown`]: Orchestrator::shutdown
#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    fn from_builder(builder: OrchestratorBuilder) -> Self {
        let OrchestratorBuilder {
            config,
            client,
            tools,
        } = builder;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shared = Shared {
            history: Arc::new(ConversationHistory::with_capacity(
                config.history_capacity,
            )),
            config: Arc::new(config),
            inbox: Arc::new(SharedQueue::new()),
            outbox: Arc::new(SharedQueue::new()),
            bridge: Bridge::new(),
            tools: Arc::new(RwLock::new(tools)),
            command_tx,
            parts: Mutex::new(Some(LoopParts { client, command_rx })),
            event_loop: Mutex::new(None),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Brings up the event loop.
    ///
    /// Prompts submitted earlier are processed once the loop runs. An
    /// orchestrator can be started only once, even if the first attempt
    /// failed.
    pub fn start(&self) -> Result<(), Error> {
        let LoopParts { client, command_rx } = lock(&self.shared.parts)
            .take()
            .ok_or_else(Error::already_started)?;

        let shared = &self.shared;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let state = LoopState::new(shared, client, completion_tx);
        let handle = EventLoop::spawn(LOOP_THREAD_NAME, move || {
            state.run(completion_rx, command_rx)
        })
        .map_err(|err| {
            error!("failed to start the event loop: {err}");
            Error::runtime().with_reason(format!("{err}"))
        })?;

        info!("event loop started");
        *lock(&shared.event_loop) = Some(handle);
        // Prompts may have been queued before the loop existed.
        shared.bridge.wake();
        Ok(())
    }

    /// Returns `true` if the event loop has been started and is still
    /// running.
    pub fn is_running(&self) -> bool {
        lock(&self.shared.event_loop)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Queues a prompt under the correlation id `id` and returns
    /// immediately.
    ///
    /// The configured prompt suffix, if any, is appended to `text`.
    pub fn submit_prompt<I, S>(&self, id: I, text: S)
    where
        I: Into<String>,
        S: Into<String>,
    {
        let id = id.into();
        let mut text = text.into();
        if let Some(suffix) = &self.shared.config.prompt_suffix {
            text.push_str(suffix);
        }
        trace!("queued prompt {id}");
        self.shared.inbox.push(Prompt { id, text });
        self.shared.bridge.wake();
    }

    /// Takes the next answer if one is ready.
    ///
    /// `None` means no answer is ready yet, not that something failed.
    #[inline]
    pub fn poll_answer(&self) -> Option<Answer> {
        self.shared.outbox.try_pop()
    }

    /// Waits up to `timeout` for the next answer.
    #[inline]
    pub fn wait_answer(&self, timeout: Duration) -> Option<Answer> {
        self.shared.outbox.pop_timeout(timeout)
    }

    /// Registers a tool, replacing any tool with the same name.
    ///
    /// Returns `false` if the name is empty. Tools registered while the
    /// loop runs are advertised from the next round trip on.
    pub fn register_tool<F: ToolFunction>(
        &self,
        name: &str,
        definition: ToolDefinition,
        function: F,
    ) -> bool {
        self.shared
            .tools
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(name, definition, function)
    }

    /// Returns the definitions advertised to the model, in registration
    /// order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.shared
            .tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .definitions()
    }

    /// Returns a snapshot of the sliding window, oldest first.
    #[inline]
    pub fn history(&self) -> Vec<Message> {
        self.shared.history.snapshot()
    }

    /// Returns the correlation ids of the sessions not yet retired.
    ///
    /// The query is served by the event-loop thread, so it fails with
    /// [`crate::ErrorKind::NotRunning`] if the loop isn't running, and with
    /// [`crate::ErrorKind::Busy`] if the loop doesn't get to it within a
    /// second, which happens while a slow tool runs.
    pub fn pending_sessions(&self) -> Result<Vec<String>, Error> {
        if !self.is_running() {
            return Err(Error::not_running());
        }
        let (reply_tx, reply_rx) = std_mpsc::sync_channel(1);
        self.shared
            .command_tx
            .send(Command::PendingSessions(reply_tx))
            .map_err(|_| Error::not_running())?;
        reply_rx.recv_timeout(COMMAND_TIMEOUT).map_err(|err| match err {
            RecvTimeoutError::Timeout => Error::busy()
                .with_reason(format!("no reply within {COMMAND_TIMEOUT:?}")),
            RecvTimeoutError::Disconnected => Error::not_running(),
        })
    }

    /// Stops the event loop and waits for its thread to exit.
    ///
    /// Round trips still in flight are abandoned. Answers already
    /// published can still be collected.
    pub fn shutdown(&self) {
        let handle = lock(&self.shared.event_loop).take();
        if let Some(handle) = handle {
            info!("shutting down the event loop");
            handle.shutdown();
        }
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
