//! Tool call supports.

mod args;
mod executor;
mod registry;

use std::collections::BTreeMap;

use aiagent_model::{ArgValue, Message};

pub use args::parse_arguments;
pub(crate) use executor::Executor;
pub use registry::ToolRegistry;

/// Named arguments passed to a tool.
pub type ToolArguments = BTreeMap<String, ArgValue>;

/// The outcome of a tool invocation.
///
/// A `code` of zero means success, anything else is a failure described
/// by `description`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionResult {
    /// Status code, zero on success.
    pub code: i32,
    /// Human readable description of the outcome.
    pub description: String,
    /// The result handed back to the model.
    pub value: Option<ArgValue>,
}

impl FunctionResult {
    /// Creates a successful result.
    #[inline]
    pub fn success<V: Into<ArgValue>>(value: V) -> Self {
        Self {
            code: 0,
            description: "Success".to_owned(),
            value: Some(value.into()),
        }
    }

    /// Creates a failed result with code `-1`.
    #[inline]
    pub fn failure<S: Into<String>>(description: S) -> Self {
        Self {
            code: -1,
            description: description.into(),
            value: None,
        }
    }

    /// Returns `true` if the code is zero.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Converts the result into the tool message fed back to the model.
    ///
    /// Failures are reported as `"Error: <description>"` and are not bound
    /// to the call id.
    pub(crate) fn into_message(self, call_id: &str) -> Message {
        if !self.is_success() {
            return Message::tool_error(format!("Error: {}", self.description));
        }
        let content = self.value.map(|v| v.to_string()).unwrap_or_default();
        Message::tool_result(call_id, content)
    }
}

/// Information about the call being served, handed to every tool.
///
/// Tools run inside a `tool` span, so events they log are attributed to
/// the call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolContext {
    tool_name: String,
    call_id: String,
}

impl ToolContext {
    /// Creates a context for the call `call_id` to `tool_name`.
    #[inline]
    pub fn new<N: Into<String>, I: Into<String>>(tool_name: N, call_id: I) -> Self {
        Self {
            tool_name: tool_name.into(),
            call_id: call_id.into(),
        }
    }

    /// Returns the name of the tool being called.
    #[inline]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the id of the call.
    #[inline]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }
}

/// A function that can be called by the model.
///
/// Tools run synchronously on the event loop thread, which stalls every
/// other round trip until they return. They should be fast, local and
/// must not block. Implementations should be stateless.
///
/// Any `Fn(&ToolArguments, &ToolContext) -> FunctionResult` closure is a
/// tool.
pub trait ToolFunction: Send + Sync + 'static {
    /// Runs the tool.
    fn call(&self, arguments: &ToolArguments, context: &ToolContext) -> FunctionResult;
}

impl<F> ToolFunction for F
where
    F: Fn(&ToolArguments, &ToolContext) -> FunctionResult + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, arguments: &ToolArguments, context: &ToolContext) -> FunctionResult {
        self(arguments, context)
    }
}

#[cfg(test)]
mod tests {
    use aiagent_model::Role;

    use super::*;

    #[test]
    fn test_into_message() {
        let msg = FunctionResult::success("25 degrees").into_message("call_1");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.content, "25 degrees");
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));

        let msg = FunctionResult::failure("missing unit").into_message("call_2");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.content, "Error: missing unit");
        assert_eq!(msg.tool_call_id, None);

        let empty = FunctionResult {
            value: None,
            ..FunctionResult::success("")
        };
        assert_eq!(empty.into_message("call_3").content, "");
    }
}
