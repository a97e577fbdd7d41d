use std::sync::{Arc, PoisonError, RwLock};

use aiagent_model::{Message, ToolCall, ToolDefinition};

use super::{ToolArguments, ToolContext, ToolFunction, ToolRegistry, parse_arguments};
use crate::Error;

/// Runs the tool calls requested by the model against a shared registry.
#[derive(Clone)]
pub(crate) struct Executor {
    registry: Arc<RwLock<ToolRegistry>>,
}

impl Executor {
    #[inline]
    pub fn new(registry: Arc<RwLock<ToolRegistry>>) -> Self {
        Self { registry }
    }

    /// Returns the definitions of all registered tools.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .definitions()
    }

    #[inline]
    fn lookup(&self, name: &str) -> Result<Arc<dyn ToolFunction>, Error> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(name)
    }

    /// Executes one tool call synchronously and returns the message to feed
    /// back to the model.
    ///
    /// Unparseable arguments degrade to an empty argument set. The only
    /// error returned is an unknown tool. The registry lock is released
    /// before the tool runs.
    pub fn execute(&self, call: &ToolCall) -> Result<Message, Error> {
        let span = debug_span!("tool", name = %call.name, id = %call.id);
        let _enter = span.enter();

        let arguments = parse_arguments(&call.raw_arguments).unwrap_or_else(|err| {
            warn!("{err}, invoking with no arguments");
            ToolArguments::new()
        });
        let function = self.lookup(&call.name)?;

        trace!("invoking with args: {arguments:?}");
        let context = ToolContext::new(&call.name, &call.id);
        let result = function.call(&arguments, &context);
        if !result.is_success() {
            let err = Error::tool_execution()
                .with_reason(format!("code {}: {}", result.code, result.description));
            warn!("{err}");
        }
        Ok(result.into_message(&call.id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use aiagent_model::{ArgValue, Role};

    use super::*;
    use crate::ErrorKind;
    use crate::tool::FunctionResult;

    fn executor_with_echo(calls: Arc<AtomicUsize>) -> Executor {
        let mut registry = ToolRegistry::new();
        registry.register(
            "echo",
            ToolDefinition::new("echo", "Echoes its arguments"),
            move |args: &ToolArguments, _: &ToolContext| {
                calls.fetch_add(1, Ordering::SeqCst);
                let object = ArgValue::Object(args.clone());
                FunctionResult::success(object.to_string())
            },
        );
        Executor::new(Arc::new(RwLock::new(registry)))
    }

    #[test]
    fn test_execute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = executor_with_echo(Arc::clone(&calls));

        let msg = executor
            .execute(&ToolCall::function("call_1", "echo", r#"{"x":"y"}"#))
            .unwrap();
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.content, r#"{"x":"y"}"#);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bad_arguments_still_invoke() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = executor_with_echo(Arc::clone(&calls));

        let msg = executor
            .execute(&ToolCall::function("call_1", "echo", "[not an object]"))
            .unwrap();
        assert_eq!(msg.content, "{}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_tool() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = executor_with_echo(Arc::clone(&calls));

        let err = executor
            .execute(&ToolCall::function("call_1", "paint", "{}"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTool);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
