use crate::{Message, Role};

/// Token accounting reported by the remote model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u64,
    /// Tokens in the completion.
    pub completion_tokens: u64,
    /// Sum of both.
    pub total_tokens: u64,
}

/// One candidate answer in a response.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Position of the choice in the response.
    pub index: u32,
    /// The generated message.
    pub message: Message,
    /// The reason the model stopped, e.g. `"stop"` or `"tool_calls"`.
    pub finish_reason: Option<String>,
}

/// A fully parsed chat-completions response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChatCompletionsResponse {
    /// Identifier assigned by the remote model.
    pub id: String,
    /// Object type, usually `"chat.completion"`.
    pub object: String,
    /// Creation time as a unix timestamp.
    pub created: i64,
    /// The model that produced the response.
    pub model: String,
    /// The candidate answers.
    pub choices: Vec<Choice>,
    /// Token usage, if reported.
    pub usage: Option<Usage>,
}

impl ChatCompletionsResponse {
    /// Returns the first choice authored by the assistant.
    ///
    /// When several assistant choices are present, the first one wins and
    /// the others are ignored.
    #[inline]
    pub fn assistant_message(&self) -> Option<&Message> {
        self.choices
            .iter()
            .map(|choice| &choice.message)
            .find(|msg| msg.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_assistant_wins() {
        let choice = |index, message| Choice {
            index,
            message,
            finish_reason: Some("stop".to_owned()),
        };
        let response = ChatCompletionsResponse {
            choices: vec![
                choice(0, Message::user("echo")),
                choice(1, Message::assistant("first")),
                choice(2, Message::assistant("second")),
            ],
            ..Default::default()
        };
        let msg = response.assistant_message().unwrap();
        assert_eq!(msg.content, "first");

        let empty = ChatCompletionsResponse::default();
        assert!(empty.assistant_message().is_none());
    }
}
