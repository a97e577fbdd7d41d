//! JSON encoding of requests and decoding of responses.
//!
//! The payload shape (`model`, `messages[]`, `tools[]` out, `choices[]` in)
//! is dictated by the chat-completions API.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{self, Display};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ChatCompletionsResponse, ChatRequest, Choice, Message, Role, ToolCall,
    ToolDefinition, Usage,
};

/// Error returned when a payload can't be encoded or decoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodecError {
    message: String,
}

impl CodecError {
    #[inline]
    fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codec error: {}", self.message)
    }
}

impl Error for CodecError {}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Serialize)]
struct FunctionCallOut<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct ToolCallOut<'a> {
    id: &'a str,
    r#type: &'a str,
    function: FunctionCallOut<'a>,
}

#[derive(Serialize)]
struct MessageOut<'a> {
    role: Role,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCallOut<'a>>,
}

#[derive(Serialize)]
struct PropertyOut<'a> {
    r#type: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct ParametersOut<'a> {
    r#type: &'static str,
    properties: BTreeMap<&'a str, PropertyOut<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    required: Vec<&'a str>,
}

#[derive(Serialize)]
struct FunctionOut<'a> {
    name: &'a str,
    description: &'a str,
    parameters: ParametersOut<'a>,
}

#[derive(Serialize)]
struct ToolOut<'a> {
    r#type: &'static str,
    function: FunctionOut<'a>,
}

#[derive(Serialize)]
struct RequestOut<'a> {
    model: &'a str,
    messages: Vec<MessageOut<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolOut<'a>>,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Deserialize)]
struct FunctionCallIn {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct ToolCallIn {
    id: String,
    #[serde(default = "default_tool_kind")]
    r#type: String,
    function: FunctionCallIn,
}

#[derive(Deserialize)]
struct MessageIn {
    role: Role,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_call_id: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallIn>>,
}

#[derive(Deserialize)]
struct ChoiceIn {
    #[serde(default)]
    index: u32,
    message: MessageIn,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct UsageIn {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Deserialize)]
struct ResponseIn {
    #[serde(default)]
    id: String,
    #[serde(default)]
    object: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    model: String,
    // Choices are parsed one by one so that a malformed entry doesn't
    // discard the others.
    choices: Vec<Value>,
    #[serde(default)]
    usage: Option<UsageIn>,
}

#[inline]
fn default_tool_kind() -> String {
    "function".to_owned()
}

// -----------
// Conversions
// -----------

/// Encodes a request into its JSON payload.
pub fn encode(req: &ChatRequest) -> Result<Bytes, CodecError> {
    let payload = RequestOut {
        model: &req.model,
        messages: req.messages.iter().map(create_message).collect(),
        tools: req.tools.iter().map(create_tool).collect(),
    };
    serde_json::to_vec(&payload)
        .map(Bytes::from)
        .map_err(|err| CodecError::new(format!("{err}")))
}

/// Decodes a response body.
///
/// Choices that can't be parsed are skipped. A body without a `choices`
/// array is an error, an empty array is not.
pub fn decode(body: &[u8]) -> Result<ChatCompletionsResponse, CodecError> {
    let resp: ResponseIn = serde_json::from_slice(body)
        .map_err(|err| CodecError::new(format!("{err}")))?;
    let choices = resp
        .choices
        .into_iter()
        .filter_map(|choice| serde_json::from_value::<ChoiceIn>(choice).ok())
        .map(parse_choice)
        .collect();
    Ok(ChatCompletionsResponse {
        id: resp.id,
        object: resp.object,
        created: resp.created,
        model: resp.model,
        choices,
        usage: resp.usage.map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }),
    })
}

#[inline]
fn create_message(msg: &Message) -> MessageOut<'_> {
    MessageOut {
        role: msg.role,
        content: &msg.content,
        tool_call_id: msg.tool_call_id.as_deref(),
        tool_calls: msg
            .tool_calls
            .iter()
            .map(|call| ToolCallOut {
                id: &call.id,
                r#type: &call.kind,
                function: FunctionCallOut {
                    name: &call.name,
                    arguments: &call.raw_arguments,
                },
            })
            .collect(),
    }
}

#[inline]
fn create_tool(tool: &ToolDefinition) -> ToolOut<'_> {
    ToolOut {
        r#type: "function",
        function: FunctionOut {
            name: &tool.name,
            description: &tool.description,
            parameters: ParametersOut {
                r#type: "object",
                properties: tool
                    .parameters
                    .properties
                    .iter()
                    .map(|(name, prop)| {
                        (
                            name.as_str(),
                            PropertyOut {
                                r#type: &prop.r#type,
                                description: &prop.description,
                            },
                        )
                    })
                    .collect(),
                required: tool
                    .parameters
                    .required
                    .iter()
                    .map(String::as_str)
                    .collect(),
            },
        },
    }
}

#[inline]
fn parse_choice(choice: ChoiceIn) -> Choice {
    let msg = choice.message;
    let tool_calls = msg
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            kind: call.r#type,
            name: call.function.name,
            raw_arguments: call.function.arguments,
        })
        .collect();
    Choice {
        index: choice.index,
        message: Message {
            role: msg.role,
            content: msg.content.unwrap_or_default(),
            tool_call_id: msg.tool_call_id,
            tool_calls,
        },
        finish_reason: choice.finish_reason,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_request() {
        let request = ChatRequest {
            model: "qwen-plus".to_owned(),
            messages: vec![
                Message::system("You are a helpful assistant."),
                Message::user("Weather in Paris?"),
                Message::assistant("").with_tool_calls(vec![ToolCall::function(
                    "call_1",
                    "get_current_weather",
                    r#"{"location":"Paris"}"#,
                )]),
                Message::tool_result("call_1", "25 degrees"),
                Message::tool_error("Error: no unit"),
            ],
            tools: vec![
                ToolDefinition::new("get_current_weather", "Weather lookup")
                    .with_parameter("location", "string", "The city", true),
            ],
        };
        let body = encode(&request).unwrap();
        let actual: Value = serde_json::from_slice(&body).unwrap();
        let expected = json!({
            "model": "qwen-plus",
            "messages": [
                { "role": "system", "content": "You are a helpful assistant." },
                { "role": "user", "content": "Weather in Paris?" },
                {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_current_weather",
                            "arguments": "{\"location\":\"Paris\"}"
                        }
                    }]
                },
                { "role": "tool", "content": "25 degrees", "tool_call_id": "call_1" },
                { "role": "tool", "content": "Error: no unit" }
            ],
            "tools": [{
                "type": "function",
                "function": {
                    "name": "get_current_weather",
                    "description": "Weather lookup",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "location": { "type": "string", "description": "The city" }
                        },
                        "required": ["location"]
                    }
                }
            }]
        });
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_encode_without_tools() {
        let request = ChatRequest {
            model: "m".to_owned(),
            messages: vec![Message::user("hi")],
            tools: vec![],
        };
        let actual: Value =
            serde_json::from_slice(&encode(&request).unwrap()).unwrap();
        assert!(actual.get("tools").is_none());
    }

    #[test]
    fn test_decode_tool_calls() {
        let body = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "qwen-plus",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "echo", "arguments": "{\"x\":\"y\"}" }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        });
        let resp = decode(body.to_string().as_bytes()).unwrap();
        assert_eq!(resp.id, "chatcmpl-1");
        assert_eq!(resp.usage.unwrap().total_tokens, 15);
        let msg = resp.assistant_message().unwrap();
        assert_eq!(msg.content, "");
        assert_eq!(
            msg.tool_calls,
            vec![ToolCall::function("call_1", "echo", r#"{"x":"y"}"#)]
        );
    }

    #[test]
    fn test_decode_skips_malformed_choices() {
        let body = json!({
            "choices": [
                { "index": 0, "message": { "content": "no role" } },
                { "index": 1, "message": { "role": "assistant", "content": "ok" } }
            ]
        });
        let resp = decode(body.to_string().as_bytes()).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].index, 1);
        assert_eq!(resp.choices[0].message.content, "ok");
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode(b"not json").is_err());
        assert!(decode(br#"{"id":"x"}"#).is_err());

        let resp = decode(br#"{"choices":[]}"#).unwrap();
        assert!(resp.choices.is_empty());
    }
}
