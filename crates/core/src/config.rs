//! Orchestrator configuration.

use std::fmt::{self, Debug};
use std::time::Duration;

/// The model used when none is configured.
pub const DEFAULT_MODEL: &str = "qwen-plus";
/// The endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/compatible-mode/v1/chat/completions";
/// How many messages the sliding window keeps by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
/// How often finished sessions are retired by default.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(200);

/// Builder for [`Config`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConfigBuilder {
    api_key: String,
    model: Option<String>,
    endpoint: Option<String>,
    history_capacity: Option<usize>,
    sweep_interval: Option<Duration>,
    system_prompt: Option<String>,
    prompt_suffix: Option<String>,
}

impl ConfigBuilder {
    /// Creates a builder with the given API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            endpoint: None,
            history_capacity: None,
            sweep_interval: None,
            system_prompt: None,
            prompt_suffix: None,
        }
    }

    /// Sets the model to use.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the full URL of the chat-completions endpoint.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets how many messages the sliding window keeps. Values below 1
    /// are raised to 1.
    #[inline]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    /// Sets how often finished sessions are retired.
    #[inline]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Sets a system prompt sent ahead of the history on every round trip.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets a text appended to every submitted prompt.
    #[inline]
    pub fn with_prompt_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.prompt_suffix = Some(suffix.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> Config {
        Config {
            api_key: self.api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            history_capacity: self
                .history_capacity
                .unwrap_or(DEFAULT_HISTORY_CAPACITY)
                .max(1),
            sweep_interval: self
                .sweep_interval
                .unwrap_or(DEFAULT_SWEEP_INTERVAL),
            system_prompt: self.system_prompt,
            prompt_suffix: self.prompt_suffix,
        }
    }
}

impl Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("history_capacity", &self.history_capacity)
            .field("sweep_interval", &self.sweep_interval)
            .field("system_prompt", &self.system_prompt)
            .field("prompt_suffix", &self.prompt_suffix)
            .finish()
    }
}

/// Configuration of an [`crate::Orchestrator`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Config {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) endpoint: String,
    pub(crate) history_capacity: usize,
    pub(crate) sweep_interval: Duration,
    pub(crate) system_prompt: Option<String>,
    pub(crate) prompt_suffix: Option<String>,
}

impl Config {
    /// Returns the model name.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the endpoint URL.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the capacity of the sliding window.
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Returns the sweep interval.
    #[inline]
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("history_capacity", &self.history_capacity)
            .field("sweep_interval", &self.sweep_interval)
            .field("system_prompt", &self.system_prompt)
            .field("prompt_suffix", &self.prompt_suffix)
            .finish()
    }
}
