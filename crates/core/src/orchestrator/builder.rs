use aiagent_model::{ToolDefinition, Transport};

use super::Orchestrator;
use crate::config::Config;
use crate::model_client::ModelClient;
use crate::tool::{ToolFunction, ToolRegistry};

/// [`Orchestrator`] builder.
pub struct OrchestratorBuilder {
    pub(crate) config: Config,
    pub(crate) client: ModelClient,
    pub(crate) tools: ToolRegistry,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the given configuration and transport.
    #[inline]
    pub fn with_transport<T: Transport + 'static>(
        config: Config,
        transport: T,
    ) -> Self {
        Self {
            config,
            client: ModelClient::new(transport),
            tools: ToolRegistry::new(),
        }
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<F: ToolFunction>(
        mut self,
        name: &str,
        definition: ToolDefinition,
        function: F,
    ) -> Self {
        self.tools.register(name, definition, function);
        self
    }

    /// Builds the orchestrator. The event loop is not started yet.
    #[inline]
    pub fn build(self) -> Orchestrator {
        debug!("building orchestrator with {:?}", self.config);
        Orchestrator::from_builder(self)
    }
}
