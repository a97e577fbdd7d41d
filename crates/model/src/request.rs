use crate::{Message, ToolDefinition};

/// A request to be sent to the remote model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatRequest {
    /// Name of the model.
    pub model: String,
    /// The conversation, oldest message first.
    pub messages: Vec<Message>,
    /// Tools that are available to the model.
    pub tools: Vec<ToolDefinition>,
}
