// Chat completion port
//
// Request types mirror the OpenAI chat completions shape so the HTTP
// adapter can serialize them directly.

use async_trait::async_trait;
use serde::Serialize;

use super::errors::AssistantResult;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One part of a multimodal message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message content: plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Message in a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: ChatContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: ChatContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: ChatContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: ChatContent::Text(text.into()),
        }
    }

    /// User message carrying text and an image (usually a `data:` URL)
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: ChatContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }

    /// Text content, if this is a plain text message
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            ChatContent::Text(text) => Some(text),
            ChatContent::Parts(_) => None,
        }
    }
}

/// A chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Overrides the client's default model when set
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    /// Ask the provider to constrain output to a JSON object
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            temperature: None,
            max_tokens: 500,
            json_mode: false,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// A chat completion provider
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the text of the first completion choice
    async fn complete(&self, request: ChatRequest) -> AssistantResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_message_serializes_as_string_content() {
        let value = serde_json::to_value(ChatMessage::system("be nice")).unwrap();
        assert_eq!(value, json!({"role": "system", "content": "be nice"}));
    }

    #[test]
    fn image_message_serializes_as_parts() {
        let msg = ChatMessage::user_with_image("what is this?", "data:image/png;base64,AAA");
        let value = serde_json::to_value(msg).unwrap();

        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "what is this?"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAA"}}
                ]
            })
        );
    }

    #[test]
    fn builder_sets_fields() {
        let req = ChatRequest::new(vec![ChatMessage::user("hi")])
            .temperature(0.3)
            .max_tokens(150)
            .json();

        assert_eq!(req.temperature, Some(0.3));
        assert_eq!(req.max_tokens, 150);
        assert!(req.json_mode);
        assert!(req.model.is_none());
    }
}
