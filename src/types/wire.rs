//! Wire types for the chat-completions endpoint.
//!
//! One request shape, one response shape, and the error envelope the API
//! uses for failures. The protocol is stateless: every request carries the
//! full transcript.

use serde::{Deserialize, Serialize};

use crate::types::{KnownModel, Message};

/// Parameters for a single completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to complete with.
    pub model: KnownModel,

    /// The full ordered transcript.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    pub temperature: f32,
}

impl ChatRequest {
    /// Create a new request from a transcript snapshot.
    pub fn new(model: KnownModel, messages: Vec<Message>, temperature: f32) -> Self {
        Self {
            model,
            messages,
            temperature,
        }
    }
}

/// A successful completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// The completion choices; the first one carries the reply.
    pub choices: Vec<Choice>,

    /// Token accounting, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    /// The reply text from the first choice, if any.
    pub fn reply_text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The message generated for this choice.
    pub message: ReplyMessage,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage {
    /// Role reported by the server; absent in some fixtures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<crate::types::Role>,

    /// The reply text.
    pub content: String,
}

/// Token accounting reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the request.
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens generated in the reply.
    #[serde(default)]
    pub completion_tokens: u64,

    /// Total tokens billed.
    #[serde(default)]
    pub total_tokens: u64,
}

/// The error envelope the API returns for failures.
///
/// The `error` field is required; a success body never parses as this.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Details of an API error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,

    /// Machine-readable error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Parameter that caused the error, if any.
    #[serde(default)]
    pub param: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::{json, to_value};

    #[test]
    fn request_shape() {
        let request = ChatRequest::new(
            KnownModel::Gpt35Turbo,
            vec![Message::user("list of countries by gdp")],
            0.0,
        );
        let json = to_value(&request).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "user", "content": "list of countries by gdp"}
                ],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn completion_parses() {
        let json = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "hi there"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        });

        let completion: ChatCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(completion.reply_text(), Some("hi there"));
        assert_eq!(completion.choices[0].message.role, Some(Role::Assistant));
        assert_eq!(completion.usage.unwrap().total_tokens, 12);
    }

    #[test]
    fn completion_without_choices() {
        let json = json!({"choices": []});
        let completion: ChatCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(completion.reply_text(), None);
    }

    #[test]
    fn error_envelope_parses() {
        let json = json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        });

        let envelope: ErrorEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(
            envelope.error.error_type.as_deref(),
            Some("invalid_request_error")
        );
    }

    #[test]
    fn success_body_is_not_an_error_envelope() {
        let body = r#"{"choices":[{"message":{"content":"ok"}}]}"#;
        assert!(serde_json::from_str::<ErrorEnvelope>(body).is_err());
    }
}
