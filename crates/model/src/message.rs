use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// Input from the user.
    User,
    /// Output from the model.
    Assistant,
    /// The result of a tool call.
    Tool,
}

impl Role {
    /// Returns the wire name of the role.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool call request embedded in an assistant message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCall {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The kind of the call, always `"function"` for now.
    pub kind: String,
    /// The name of the tool to call.
    pub name: String,
    /// The arguments as the model produced them. This is usually a JSON
    /// object, but nothing guarantees that.
    pub raw_arguments: String,
}

impl ToolCall {
    /// Creates a function tool call.
    #[inline]
    pub fn function<I, N, A>(id: I, name: N, raw_arguments: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            id: id.into(),
            kind: "function".to_owned(),
            name: name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }
}

/// A single message of the conversation.
///
/// Messages are never modified once appended to the history.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,
    /// The text content, may be empty for assistant messages that only
    /// carry tool calls.
    pub content: String,
    /// For tool messages, the id of the call this message answers.
    pub tool_call_id: Option<String>,
    /// Tool calls requested by the model, in the order it returned them.
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    #[inline]
    fn with_role<S: Into<String>>(role: Role, content: S) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: vec![],
        }
    }

    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Creates an assistant message without tool calls.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Creates a tool message that answers the call `call_id`.
    #[inline]
    pub fn tool_result<I, S>(call_id: I, content: S) -> Self
    where
        I: Into<String>,
        S: Into<String>,
    {
        Self {
            tool_call_id: Some(call_id.into()),
            ..Self::with_role(Role::Tool, content)
        }
    }

    /// Creates a tool message reporting a failure. It is not bound to any
    /// call id.
    #[inline]
    pub fn tool_error<S: Into<String>>(content: S) -> Self {
        Self::with_role(Role::Tool, content)
    }

    /// Attaches tool calls to the message.
    #[inline]
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Returns `true` if the model asked for at least one tool call.
    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
