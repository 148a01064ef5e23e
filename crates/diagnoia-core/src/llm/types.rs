//! Request/response types for the Ollama chat API

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// Sampling options forwarded to the model
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
}

/// Request body for `/api/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model tag (e.g., "llama3.2:3b")
    pub model: String,
    pub messages: Vec<Message>,
    /// Always false: the assistant waits for the whole answer
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            options: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options = Some(ChatOptions { temperature });
        self
    }
}

/// Response from `/api/chat` with `stream: false`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub message: Message,
    #[serde(default)]
    pub done: bool,
    /// Tokens in the prompt, when reported
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// Tokens generated, when reported
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Response from `/api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest::new("llama3.2:3b", vec![Message::user("Hola")])
            .with_temperature(0.0);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2:3b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hola");
        assert_eq!(json["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_chat_request_without_options() {
        let request = ChatRequest::new("tinyllama", vec![Message::system("x")]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_chat_response_deserialization() {
        let body = r#"{
            "model": "llama3.2:3b",
            "created_at": "2024-05-01T10:00:00Z",
            "message": {"role": "assistant", "content": "Ana Gil presenta fiebre."},
            "done": true,
            "prompt_eval_count": 120,
            "eval_count": 14
        }"#;

        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.role, MessageRole::Assistant);
        assert_eq!(response.message.content, "Ana Gil presenta fiebre.");
        assert!(response.done);
        assert_eq!(response.eval_count, Some(14));
    }

    #[test]
    fn test_tags_response() {
        let body = r#"{"models": [{"name": "llama3.2:3b", "size": 2019393189}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(tags.models[0].name, "llama3.2:3b");
    }

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }
}
