use std::collections::HashMap;
use std::sync::Arc;

use aiagent_model::ToolDefinition;

use super::ToolFunction;
use crate::Error;

struct RegisteredTool {
    definition: ToolDefinition,
    function: Arc<dyn ToolFunction>,
}

/// Maps tool names to their functions and to the definitions advertised to
/// the model.
///
/// Definitions are listed in registration order. Re-registering a name
/// replaces the previous tool in place.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under `name`.
    ///
    /// Empty names are rejected, the call is logged and ignored. The
    /// advertised definition always carries `name`, whatever name the given
    /// definition has. Returns `true` if the tool was registered.
    pub fn register<F: ToolFunction>(
        &mut self,
        name: &str,
        definition: ToolDefinition,
        function: F,
    ) -> bool {
        self.register_shared(name, definition, Arc::new(function))
    }

    pub(crate) fn register_shared(
        &mut self,
        name: &str,
        mut definition: ToolDefinition,
        function: Arc<dyn ToolFunction>,
    ) -> bool {
        if name.trim().is_empty() {
            error!("refusing to register a tool with an empty name");
            return false;
        }
        if definition.name != name {
            warn!(
                "tool definition name `{}` differs from `{name}`, using `{name}`",
                definition.name
            );
            definition.name = name.to_owned();
        }

        let tool = RegisteredTool {
            definition,
            function,
        };
        match self.index.get(name) {
            Some(&idx) => {
                debug!("replaced tool: {name}");
                self.tools[idx] = tool;
            }
            None => {
                debug!("added tool: {name}");
                self.index.insert(name.to_owned(), self.tools.len());
                self.tools.push(tool);
            }
        }
        true
    }

    /// Looks up the function registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn ToolFunction>, Error> {
        self.index
            .get(name)
            .map(|&idx| Arc::clone(&self.tools[idx].function))
            .ok_or_else(|| {
                Error::unknown_tool().with_reason(format!("no tool named `{name}`"))
            })
    }

    /// Returns the definitions of all registered tools.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition.clone()).collect()
    }

    /// Returns `true` if a tool is registered under `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
