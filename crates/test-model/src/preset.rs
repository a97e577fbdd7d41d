use aiagent_model::ToolCall;
use serde::{Deserialize, Serialize};

/// A function call inside a preset tool call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetFunction {
    /// The tool name.
    pub name: String,
    /// The raw JSON arguments, as text.
    pub arguments: String,
}

/// A tool call requested by a preset assistant message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetToolCall {
    /// The call id.
    pub id: String,
    /// Always `"function"` in practice.
    pub r#type: String,
    /// The call itself.
    pub function: PresetFunction,
}

/// A message inside a preset choice.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetMessage {
    /// The role, e.g. `"assistant"`.
    pub role: String,
    /// The text, `null` when omitted.
    pub content: Option<String>,
    /// The requested tool calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<PresetToolCall>,
}

/// A choice in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetChoice {
    /// Position of the choice.
    pub index: u32,
    /// The message.
    pub message: PresetMessage,
    /// Why the model stopped.
    pub finish_reason: Option<String>,
}

/// A chat-completions response body served by
/// [`crate::ScriptedTransport`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Response id.
    pub id: String,
    /// Object type.
    pub object: String,
    /// Creation timestamp.
    pub created: i64,
    /// Model name.
    pub model: String,
    /// Choices, possibly none.
    pub choices: Vec<PresetChoice>,
}

impl PresetResponse {
    /// Creates a response with no choices at all.
    #[inline]
    pub fn empty() -> Self {
        Self {
            id: "chatcmpl-test".to_owned(),
            object: "chat.completion".to_owned(),
            created: 0,
            model: "test-model".to_owned(),
            choices: vec![],
        }
    }

    /// Creates a response with one assistant message and no tool calls.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::empty().with_choice("assistant", content)
    }

    /// Creates a response with one assistant message requesting `calls`.
    pub fn tool_calls(calls: impl IntoIterator<Item = ToolCall>) -> Self {
        let tool_calls = calls
            .into_iter()
            .map(|call| PresetToolCall {
                id: call.id,
                r#type: call.kind,
                function: PresetFunction {
                    name: call.name,
                    arguments: call.raw_arguments,
                },
            })
            .collect();
        let mut resp = Self::empty();
        resp.choices.push(PresetChoice {
            index: 0,
            message: PresetMessage {
                role: "assistant".to_owned(),
                content: None,
                tool_calls,
            },
            finish_reason: Some("tool_calls".to_owned()),
        });
        resp
    }

    /// Appends another choice with the given role and text.
    pub fn with_choice<R, S>(mut self, role: R, content: S) -> Self
    where
        R: Into<String>,
        S: Into<String>,
    {
        let index = self.choices.len() as u32;
        self.choices.push(PresetChoice {
            index,
            message: PresetMessage {
                role: role.into(),
                content: Some(content.into()),
                tool_calls: vec![],
            },
            finish_reason: Some("stop".to_owned()),
        });
        self
    }

    /// Serializes the response into its JSON body.
    #[inline]
    pub fn to_body(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_tool_calls_body() {
        let resp = PresetResponse::tool_calls([ToolCall::function(
            "call_1",
            "echo",
            r#"{"x":"y"}"#,
        )]);
        let body: Value = serde_json::from_str(&resp.to_body()).unwrap();
        assert_eq!(
            body["choices"][0]["message"],
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "echo", "arguments": "{\"x\":\"y\"}" }
                }]
            })
        );

        let deserialized: PresetResponse =
            serde_json::from_value(body).unwrap();
        assert_eq!(resp, deserialized);
    }
}
