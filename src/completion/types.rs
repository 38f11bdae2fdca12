//! Wire types for the OpenAI-style chat completions endpoint

use serde::{Deserialize, Serialize};

use super::error::CompletionError;
use crate::store::Role;

/// A single (role, content) turn sent upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub messages: Vec<ChatMessage>,
}

/// The subset of the completions response we read
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice
    pub fn into_reply(self) -> Result<String, CompletionError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("no choices returned".to_string()))?;

        choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("first choice has no message content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.7,
            messages: vec![ChatMessage::system("Be brief."), ChatMessage::user("Hello")],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "openai/gpt-4o-mini",
                "temperature": 0.7,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hello"}
                ]
            })
        );
    }

    #[test]
    fn test_into_reply() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();

        assert_eq!(response.into_reply().unwrap(), "Hi there");
    }

    #[test]
    fn test_into_reply_without_choices() {
        let response: CompletionResponse = serde_json::from_value(json!({"id": "gen-2"})).unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(CompletionError::MalformedResponse(_))
        ));

        let response: CompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(response.into_reply().is_err());
    }

    #[test]
    fn test_into_reply_without_content() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(matches!(
            response.into_reply(),
            Err(CompletionError::MalformedResponse(_))
        ));

        let response: CompletionResponse =
            serde_json::from_value(json!({"choices": [{"finish_reason": "error"}]})).unwrap();
        assert!(response.into_reply().is_err());
    }
}
